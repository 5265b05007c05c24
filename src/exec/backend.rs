// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The relay talks to a [`ToolLauncher`] instead of `tokio::process`
//! directly. This makes it easy to swap in a fake launcher in tests while
//! keeping the production process handling here.
//!
//! - [`ProcessLauncher`] is the implementation used by `volrelay`. It spawns
//!   the interpreter, hands back its stdout and drains stderr into the log.
//!   A tool path that does not exist fails the launch with `NotFound`.
//!   The relay waits for the child after end-of-stream, so a tool that
//!   closes stdout early still runs to completion.
//! - Tests can provide their own launcher that replays canned output and
//!   records which invocations it was asked for.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, info, warn};

use super::invocation::Invocation;

/// The tool's standard output.
pub type ToolOutput = Box<dyn AsyncRead + Send + Unpin>;

/// A launched tool: its stdout and, for real processes, the child handle.
pub struct LaunchedTool {
    pub stdout: ToolOutput,
    pub process: Option<Child>,
}

impl LaunchedTool {
    /// A tool that is just a stream (no OS process behind it).
    pub fn from_output(stdout: ToolOutput) -> Self {
        Self {
            stdout,
            process: None,
        }
    }
}

/// Trait abstracting how a routine's process is started.
///
/// Production code uses [`ProcessLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ToolLauncher: Send + Sync {
    fn launch(&self, invocation: &Invocation) -> std::io::Result<LaunchedTool>;
}

/// Real launcher used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ToolLauncher for ProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> std::io::Result<LaunchedTool> {
        info!(command = %invocation.display_command(), "starting tool process");

        // The interpreter would start and merely complain on stderr; treat a
        // missing script as a failed launch instead.
        if let Some(tool) = invocation.tool() {
            if !tool.exists() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("tool not found: {}", tool.display()),
                ));
            }
        }

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("tool stdout pipe unavailable"))?;

        // Always consume stderr so the pipe can't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            drain_stderr(stderr, child.id());
        }

        Ok(LaunchedTool {
            stdout: Box::new(stdout),
            process: Some(child),
        })
    }
}

fn drain_stderr(stderr: ChildStderr, pid: Option<u32>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => debug!(pid, "stderr: {}", line),
                Ok(None) => break,
                Err(e) => {
                    debug!(pid, error = %e, "stopped reading tool stderr");
                    break;
                }
            }
        }
    });
}

/// Wait for the child to exit and log its exit code.
///
/// The exit code never changes the outcome of a run; it is only reported.
pub async fn wait_for_exit(child: &mut Child, routine: &str) {
    match child.wait().await {
        Ok(status) => {
            let code = status.code().unwrap_or(-1);
            if status.success() {
                debug!(routine = %routine, exit_code = code, "tool process exited");
            } else {
                warn!(
                    routine = %routine,
                    exit_code = code,
                    "tool process exited with non-zero status"
                );
            }
        }
        Err(e) => {
            warn!(routine = %routine, error = %e, "failed to wait for tool process");
        }
    }
}

/// Kill a child whose output can no longer be read, then reap it.
pub async fn kill_and_reap(child: &mut Child, routine: &str) {
    if let Err(e) = child.start_kill() {
        debug!(routine = %routine, error = %e, "tool process already gone");
    }
    if let Err(e) = child.wait().await {
        warn!(routine = %routine, error = %e, "failed to reap killed tool process");
    }
}
