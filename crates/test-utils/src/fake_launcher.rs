use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};
use volrelay::exec::{Invocation, LaunchedTool, ToolLauncher};

/// What the fake tool does when launched.
#[derive(Clone)]
enum Script {
    /// Emit these bytes on stdout, then end the stream.
    Output(Vec<u8>),
    /// Emit these bytes, then fail the read with this error kind.
    OutputThenError(Vec<u8>, io::ErrorKind),
    /// Fail the launch itself.
    SpawnError(io::ErrorKind),
}

/// A fake launcher that:
/// - records every invocation it receives
/// - replays canned stdout instead of starting a process.
#[derive(Clone)]
pub struct FakeLauncher {
    script: Script,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeLauncher {
    pub fn with_output(stdout: impl Into<Vec<u8>>) -> Self {
        Self::from_script(Script::Output(stdout.into()))
    }

    /// Emits `count` lines: `line 1\n` ... `line <count>\n`.
    pub fn with_lines(count: usize) -> Self {
        let text: String = (1..=count).map(|i| format!("line {i}\n")).collect();
        Self::with_output(text)
    }

    pub fn failing_after(stdout: impl Into<Vec<u8>>, kind: io::ErrorKind) -> Self {
        Self::from_script(Script::OutputThenError(stdout.into(), kind))
    }

    pub fn failing_to_spawn(kind: io::ErrorKind) -> Self {
        Self::from_script(Script::SpawnError(kind))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded invocations.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }

    pub fn launch_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl ToolLauncher for FakeLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<LaunchedTool> {
        self.invocations.lock().unwrap().push(invocation.clone());

        match &self.script {
            Script::Output(bytes) => Ok(LaunchedTool::from_output(Box::new(Cursor::new(
                bytes.clone(),
            )))),
            Script::OutputThenError(bytes, kind) => Ok(LaunchedTool::from_output(Box::new(
                FailingReader {
                    data: Cursor::new(bytes.clone()),
                    kind: *kind,
                },
            ))),
            Script::SpawnError(kind) => Err(io::Error::new(*kind, "fake launcher refused to spawn")),
        }
    }
}

/// Reads `data`, then returns an error instead of end-of-stream.
struct FailingReader {
    data: Cursor<Vec<u8>>,
    kind: io::ErrorKind,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let remaining = self.data.get_ref().len() as u64 - self.data.position();
        if remaining > 0 {
            return Pin::new(&mut self.data).poll_read(cx, buf);
        }
        Poll::Ready(Err(io::Error::new(self.kind, "fake stream broke")))
    }
}
