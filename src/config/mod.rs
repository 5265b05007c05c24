// src/config/mod.rs

//! Configuration loading and validation for volrelay.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate values that serde can't check on its own (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_FILE, load_and_validate, load_and_validate_with, load_config, load_from_path,
};
pub use model::{ConfigFile, LauncherSection, RawConfigFile, RawSessionSection, SessionDefaults};
