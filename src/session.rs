// src/session.rs

//! Explicit session state for one analyst.
//!
//! The session holds the user's selections (image, tool, OS family, routine).
//! Nothing here checks that the paths exist; the only validation is that the
//! fields needed to launch a routine are present.

use std::path::{Path, PathBuf};

use crate::catalog;
use crate::errors::{RelayError, Result};
use crate::types::OsFamily;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    image: Option<PathBuf>,
    tool: Option<PathBuf>,
    os: Option<OsFamily>,
    routine: Option<String>,
}

/// Validated inputs for a single execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub image: PathBuf,
    pub tool: PathBuf,
    pub routine: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, path: impl Into<PathBuf>) {
        self.image = non_empty_path(path.into());
    }

    pub fn set_tool(&mut self, path: impl Into<PathBuf>) {
        self.tool = non_empty_path(path.into());
    }

    pub fn set_os(&mut self, family: Option<OsFamily>) {
        self.os = family;
    }

    pub fn set_routine(&mut self, routine: impl Into<String>) {
        let routine = routine.into();
        self.routine = if routine.is_empty() {
            None
        } else {
            Some(routine)
        };
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn tool(&self) -> Option<&Path> {
        self.tool.as_deref()
    }

    pub fn os(&self) -> Option<OsFamily> {
        self.os
    }

    pub fn routine(&self) -> Option<&str> {
        self.routine.as_deref()
    }

    /// Routines offered for the selected OS family; empty when none is set.
    pub fn offered_routines(&self) -> &'static [&'static str] {
        self.os.map(catalog::routines_for).unwrap_or(&[])
    }

    /// Check the execution preconditions, in order: image, tool, routine.
    ///
    /// The OS family is deliberately not consulted here.
    pub fn run_request(&self) -> Result<RunRequest> {
        let image = self.image.clone().ok_or(RelayError::MissingImage)?;
        let tool = self.tool.clone().ok_or(RelayError::MissingTool)?;
        let routine = self.routine.clone().ok_or(RelayError::MissingRoutine)?;
        Ok(RunRequest {
            image,
            tool,
            routine,
        })
    }
}

fn non_empty_path(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
