// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually launching the analysis tool, using
//! `tokio::process::Command`, and reading its output back line by line.
//!
//! - [`invocation`] builds the `<interpreter> <tool> -f <image> <routine>`
//!   command line and resolves the interpreter.
//! - [`backend`] provides the `ToolLauncher` trait and the concrete
//!   `ProcessLauncher` that the relay uses in production, and which tests can
//!   replace with a fake implementation.
//! - [`stream`] reads stdout one line at a time, preserving terminators.

pub mod backend;
pub mod invocation;
pub mod stream;

pub use backend::{LaunchedTool, ProcessLauncher, ToolLauncher, ToolOutput};
pub use invocation::{FALLBACK_INTERPRETER, INTERPRETER_ENV, Invocation, resolve_interpreter};
pub use stream::LineStream;
