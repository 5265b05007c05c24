// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Please load a memory image first.")]
    MissingImage,

    #[error("Please load the Volatility3 script (vol.py) first.")]
    MissingTool,

    #[error("Please select a plugin to execute.")]
    MissingRoutine,

    #[error("Failed to execute plugin {routine}: {source}")]
    Spawn {
        routine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute plugin {routine}: {source}")]
    Stream {
        routine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No results to export.")]
    NoResults,

    #[error("Failed to export results: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    /// True for the errors raised before anything is launched.
    pub fn is_missing_precondition(&self) -> bool {
        matches!(
            self,
            RelayError::MissingImage | RelayError::MissingTool | RelayError::MissingRoutine
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RelayError>;
