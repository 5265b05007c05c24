#![allow(dead_code)]

use std::path::PathBuf;

use volrelay::config::{ConfigFile, LauncherSection, RawConfigFile, RawSessionSection};
use volrelay::session::Session;
use volrelay::types::OsFamily;

/// Builder for `Session` to simplify test setup.
#[derive(Default)]
pub struct SessionBuilder {
    session: Session,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with every field set to plausible values.
    pub fn complete() -> Self {
        Self::new()
            .image("/cases/host.mem")
            .tool("/opt/volatility3/vol.py")
            .os(OsFamily::Windows)
            .routine("windows.pslist")
    }

    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.session.set_image(path);
        self
    }

    pub fn tool(mut self, path: impl Into<PathBuf>) -> Self {
        self.session.set_tool(path);
        self
    }

    pub fn os(mut self, family: OsFamily) -> Self {
        self.session.set_os(Some(family));
        self
    }

    pub fn routine(mut self, routine: &str) -> Self {
        self.session.set_routine(routine);
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                launcher: LauncherSection::default(),
                session: RawSessionSection::default(),
            },
        }
    }

    pub fn interpreter(mut self, program: &str) -> Self {
        self.config.launcher.interpreter = Some(PathBuf::from(program));
        self
    }

    pub fn image(mut self, path: &str) -> Self {
        self.config.session.image = Some(PathBuf::from(path));
        self
    }

    pub fn tool(mut self, path: &str) -> Self {
        self.config.session.tool = Some(PathBuf::from(path));
        self
    }

    pub fn os(mut self, family: &str) -> Self {
        self.config.session.os = Some(family.to_string());
        self
    }

    pub fn routine(mut self, routine: &str) -> Self {
        self.config.session.routine = Some(routine.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
