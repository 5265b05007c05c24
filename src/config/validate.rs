// src/config/validate.rs

use std::path::Path;

use crate::catalog;
use crate::config::model::{ConfigFile, RawConfigFile, RawSessionSection, SessionDefaults};
use crate::errors::{RelayError, Result};
use crate::types::OsFamily;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RelayError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_launcher(&raw)?;
        let session = validate_session(raw.session)?;
        Ok(ConfigFile::new_unchecked(raw.launcher, session))
    }
}

fn validate_launcher(cfg: &RawConfigFile) -> Result<()> {
    if let Some(interpreter) = &cfg.launcher.interpreter {
        ensure_non_empty_path("[launcher].interpreter", interpreter)?;
    }
    Ok(())
}

fn validate_session(raw: RawSessionSection) -> Result<SessionDefaults> {
    if let Some(image) = &raw.image {
        ensure_non_empty_path("[session].image", image)?;
    }
    if let Some(tool) = &raw.tool {
        ensure_non_empty_path("[session].tool", tool)?;
    }

    let os = raw
        .os
        .as_deref()
        .map(|s| s.parse::<OsFamily>())
        .transpose()
        .map_err(|e| RelayError::ConfigError(format!("[session].os: {e}")))?;

    if let Some(routine) = &raw.routine {
        if routine.trim().is_empty() {
            return Err(RelayError::ConfigError(
                "[session].routine must not be empty".to_string(),
            ));
        }
        if let Some(family) = os {
            if !catalog::offers(family, routine) {
                return Err(RelayError::ConfigError(format!(
                    "[session].routine '{routine}' is not offered for OS family '{family}'"
                )));
            }
        }
    }

    Ok(SessionDefaults {
        image: raw.image,
        tool: raw.tool,
        os,
        routine: raw.routine,
    })
}

fn ensure_non_empty_path(key: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(RelayError::ConfigError(format!("{key} must not be empty")));
    }
    Ok(())
}
