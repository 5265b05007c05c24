// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::OsFamily;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [launcher]
/// interpreter = "python3"
///
/// [session]
/// image = "/cases/host.mem"
/// tool = "/opt/volatility3/vol.py"
/// os = "windows"
/// routine = "windows.pslist"
/// ```
///
/// Both sections are optional. Unknown keys are rejected so typos surface
/// instead of being silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub launcher: LauncherSection,

    #[serde(default)]
    pub session: RawSessionSection,
}

/// `[launcher]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherSection {
    /// Program that runs the tool script. See `exec::resolve_interpreter`
    /// for how this ranks against the CLI flag and environment.
    #[serde(default)]
    pub interpreter: Option<PathBuf>,
}

/// `[session]` section before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSessionSection {
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub tool: Option<PathBuf>,
    /// OS family name, case-insensitive.
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub routine: Option<String>,
}

/// Session defaults after validation.
///
/// Any value given on the command line overrides the matching field here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDefaults {
    pub image: Option<PathBuf>,
    pub tool: Option<PathBuf>,
    pub os: Option<OsFamily>,
    pub routine: Option<String>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub launcher: LauncherSection,
    pub session: SessionDefaults,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(launcher: LauncherSection, session: SessionDefaults) -> Self {
        Self { launcher, session }
    }
}
