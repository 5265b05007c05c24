// src/exec/invocation.rs

//! How a routine is turned into a command line.
//!
//! The tool is a script run by an interpreter:
//! `<interpreter> <tool> -f <image> <routine>`.
//! Environment and working directory are inherited from this process.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::session::RunRequest;

/// Interpreter used when nothing else is configured.
pub const FALLBACK_INTERPRETER: &str = "python3";

/// Environment variable naming the interpreter.
pub const INTERPRETER_ENV: &str = "VOLRELAY_PYTHON";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(interpreter: impl Into<PathBuf>, request: &RunRequest) -> Self {
        let args = vec![
            request.tool.clone().into_os_string(),
            OsString::from("-f"),
            request.image.clone().into_os_string(),
            OsString::from(&request.routine),
        ];
        Self {
            program: interpreter.into(),
            args,
        }
    }

    /// The tool script, i.e. the interpreter's first argument.
    pub fn tool(&self) -> Option<&Path> {
        self.args.first().map(Path::new)
    }

    /// Human-readable command line, for logs and `--dry-run`.
    pub fn display_command(&self) -> String {
        let mut parts = vec![quote(self.program.as_os_str())];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(s: &OsStr) -> String {
    let s = s.to_string_lossy();
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        s.into_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Pick the interpreter: CLI flag, then config, then `VOLRELAY_PYTHON`, then
/// [`FALLBACK_INTERPRETER`].
pub fn resolve_interpreter(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    resolve_interpreter_with(cli, config, std::env::var_os(INTERPRETER_ENV))
}

pub fn resolve_interpreter_with(
    cli: Option<&Path>,
    config: Option<&Path>,
    env: Option<OsString>,
) -> PathBuf {
    cli.filter(|p| !p.as_os_str().is_empty())
        .or(config.filter(|p| !p.as_os_str().is_empty()))
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_INTERPRETER))
}
