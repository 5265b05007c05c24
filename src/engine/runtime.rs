// src/engine/runtime.rs

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, trace, warn};

use crate::display::{DisplaySink, Notice};
use crate::errors::{RelayError, Result};
use crate::exec::backend::{kill_and_reap, wait_for_exit};
use crate::exec::{Invocation, LaunchedTool, LineStream, ToolLauncher};
use crate::export::export_results;
use crate::fs::FileSystem;
use crate::session::Session;

use super::core::RelayCore;
use super::{OutputBuffer, RelayEvent, RelayState};

/// Result of a run that reached end-of-stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub routine: String,
    /// Tool lines received, not counting the finished marker.
    pub lines: usize,
    pub progress: u8,
}

/// Drives [`RelayCore`] with a real (or fake) tool, forwarding every update
/// to a [`DisplaySink`].
///
/// This is the IO shell around the core: it checks preconditions, launches
/// the tool through a [`ToolLauncher`] and pumps stdout into the core one
/// line at a time.
pub struct Relay<L: ToolLauncher> {
    core: RelayCore,
    launcher: L,
    interpreter: PathBuf,
}

impl<L: ToolLauncher> fmt::Debug for Relay<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("core", &self.core)
            .field("interpreter", &self.interpreter)
            .finish_non_exhaustive()
    }
}

impl<L: ToolLauncher> Relay<L> {
    pub fn new(launcher: L, interpreter: impl Into<PathBuf>) -> Self {
        Self {
            core: RelayCore::new(),
            launcher,
            interpreter: interpreter.into(),
        }
    }

    pub fn state(&self) -> RelayState {
        self.core.state()
    }

    pub fn buffer(&self) -> &OutputBuffer {
        self.core.buffer()
    }

    pub fn progress(&self) -> u8 {
        self.core.progress()
    }

    /// Run the session's routine to completion.
    ///
    /// - Missing image, tool or routine: reported to the sink, nothing is
    ///   launched and the relay is left exactly as it was.
    /// - Otherwise every stdout line reaches the sink before the next one is
    ///   read, and the task yields to the runtime in between.
    ///
    /// After end-of-stream the child is awaited so its exit code can be
    /// logged. There is no timeout and no way to cancel a run once started;
    /// a tool that never exits keeps this future pending.
    pub async fn execute<S>(&mut self, session: &Session, sink: &mut S) -> Result<RunSummary>
    where
        S: DisplaySink + ?Sized,
    {
        let request = match session.run_request() {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "execution preconditions not met");
                sink.notify(&Notice::error(e.to_string()));
                return Err(e);
            }
        };
        let routine = request.routine.clone();

        self.apply(
            RelayEvent::Started {
                routine: routine.clone(),
            },
            sink,
        );

        let invocation = Invocation::new(&self.interpreter, &request);
        info!(
            routine = %routine,
            tool = %request.tool.display(),
            image = %request.image.display(),
            "executing routine"
        );

        let LaunchedTool { stdout, process } = match self.launcher.launch(&invocation) {
            Ok(launched) => launched,
            Err(source) => {
                warn!(routine = %routine, error = %source, "failed to launch tool");
                self.fail(&source, sink);
                return Err(RelayError::Spawn { routine, source });
            }
        };

        let mut lines = LineStream::new(stdout);
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    self.apply(RelayEvent::LineReceived(line), sink);
                    tokio::task::yield_now().await;
                }
                Ok(None) => break,
                Err(source) => {
                    warn!(
                        routine = %routine,
                        lines = self.core.lines_received(),
                        error = %source,
                        "failed reading tool output"
                    );
                    self.fail(&source, sink);
                    if let Some(mut child) = process {
                        kill_and_reap(&mut child, &routine).await;
                    }
                    return Err(RelayError::Stream { routine, source });
                }
            }
        }

        self.apply(RelayEvent::StreamEnded, sink);
        // The run is already finished; this only waits out a tool that closed
        // stdout before exiting.
        if let Some(mut child) = process {
            wait_for_exit(&mut child, &routine).await;
        }

        let summary = RunSummary {
            routine,
            lines: self.core.lines_received(),
            progress: self.core.progress(),
        };
        info!(routine = %summary.routine, lines = summary.lines, "routine finished");
        Ok(summary)
    }

    /// Write the current output buffer to `path`.
    ///
    /// Outcome (success or failure) is also reported to the sink.
    pub fn export<S>(&self, path: &Path, fs: &dyn FileSystem, sink: &mut S) -> Result<PathBuf>
    where
        S: DisplaySink + ?Sized,
    {
        match export_results(self.core.buffer(), path, fs) {
            Ok(written) => {
                sink.notify(&Notice::info(
                    "Export Successful",
                    format!("Results exported to {}", written.display()),
                ));
                Ok(written)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                sink.notify(&Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    fn fail<S>(&mut self, err: &std::io::Error, sink: &mut S)
    where
        S: DisplaySink + ?Sized,
    {
        self.apply(
            RelayEvent::Failed {
                description: err.to_string(),
            },
            sink,
        );
    }

    fn apply<S>(&mut self, event: RelayEvent, sink: &mut S)
    where
        S: DisplaySink + ?Sized,
    {
        let step = self.core.step(event);
        for update in &step.updates {
            sink.apply(update);
        }
        trace!(progress = self.core.progress(), "relay step applied");
    }
}
