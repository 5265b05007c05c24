// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RelayError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Name of the config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Volrelay.toml";

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_path_with(&RealFileSystem, path.as_ref())
}

pub fn load_from_path_with(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path).map_err(|e| {
        RelayError::ConfigError(format!("cannot read {}: {e:#}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML (unknown keys rejected).
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - empty paths and routine names,
///   - unknown OS family names,
///   - a routine that the configured OS family does not offer.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with(&RealFileSystem, path.as_ref())
}

pub fn load_and_validate_with(fs: &dyn FileSystem, path: &Path) -> Result<ConfigFile> {
    let raw_config = load_from_path_with(fs, path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the config named on the command line, or the default one if present.
///
/// - An explicit path must exist.
/// - Without one, a missing [`DEFAULT_CONFIG_FILE`] yields the empty default
///   configuration.
pub fn load_config(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate_with(fs, path),
        None => {
            let path = default_config_path();
            if fs.exists(&path) {
                load_and_validate_with(fs, &path)
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Default config location: `Volrelay.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
