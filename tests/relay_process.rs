// tests/relay_process.rs
//
// End-to-end runs through `ProcessLauncher`, with `sh` standing in for the
// Python interpreter and small shell scripts standing in for the tool.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use volrelay::engine::{Relay, RelayState};
use volrelay::errors::RelayError;
use volrelay::exec::ProcessLauncher;
use volrelay_test_utils::builders::SessionBuilder;
use volrelay_test_utils::recording_sink::RecordingSink;

fn write_tool(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("vol.sh");
    std::fs::write(&path, body).expect("write tool script");
    path
}

fn session_for(tool: &Path, routine: &str) -> volrelay::session::Session {
    SessionBuilder::new()
        .image("/cases/host.mem")
        .tool(tool)
        .routine(routine)
        .build()
}

#[tokio::test]
async fn relays_stdout_and_ignores_exit_code() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let tool = write_tool(
        &dir,
        r#"echo "args: $1 $2 $3"
i=1
while [ $i -le 5 ]; do
  echo "row $i"
  i=$((i+1))
done
echo "diagnostic noise" 1>&2
exit 3
"#,
    );

    let mut relay = Relay::new(ProcessLauncher, "sh");
    let mut sink = RecordingSink::new();
    let session = session_for(&tool, "linux.pslist");

    let summary = with_timeout(relay.execute(&session, &mut sink)).await?;

    assert_eq!(
        relay.buffer().text(),
        "args: -f /cases/host.mem linux.pslist\n\
         row 1\nrow 2\nrow 3\nrow 4\nrow 5\n\
         Execution finished.\n"
    );
    assert_eq!(summary.lines, 6);
    assert_eq!(relay.progress(), 100);
    assert_eq!(relay.state(), RelayState::Finished);
    assert!(sink.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn heavy_stderr_does_not_stall_the_relay() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let tool = write_tool(
        &dir,
        r#"i=0
while [ $i -lt 4000 ]; do
  echo "stderr line $i with some padding to fill the pipe quickly" 1>&2
  i=$((i+1))
done
echo done
"#,
    );

    let mut relay = Relay::new(ProcessLauncher, "sh");
    let mut sink = RecordingSink::new();

    with_timeout(relay.execute(&session_for(&tool, "windows.info"), &mut sink)).await?;

    assert_eq!(relay.buffer().text(), "done\nExecution finished.\n");
    Ok(())
}

#[tokio::test]
async fn missing_tool_fails_the_launch() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let tool = dir.path().join("does-not-exist.py");

    let mut relay = Relay::new(ProcessLauncher, "sh");
    let mut sink = RecordingSink::new();

    let err = with_timeout(relay.execute(&session_for(&tool, "windows.pslist"), &mut sink))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Spawn { .. }));
    assert_eq!(relay.state(), RelayState::Failed);
    assert_eq!(relay.progress(), 0);
    let text = relay.buffer().text();
    assert!(text.starts_with("Error: tool not found"), "got {text:?}");
    assert_eq!(sink.errors(), vec!["Failed to execute plugin windows.pslist"]);
}

#[tokio::test]
async fn missing_interpreter_fails_the_launch() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let tool = write_tool(&dir, "echo unreachable\n");

    let mut relay = Relay::new(ProcessLauncher, dir.path().join("no-such-interpreter"));
    let mut sink = RecordingSink::new();

    let err = with_timeout(relay.execute(&session_for(&tool, "mac.pslist"), &mut sink))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Spawn { .. }));
    assert_eq!(relay.progress(), 0);
    assert_eq!(relay.buffer().len(), 1);
    assert!(relay.buffer().lines()[0].starts_with("Error: "));
    Ok(())
}

#[test]
fn tool_outliving_its_stdout_finishes_before_shutdown() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let marker = dir.path().join("marker");
    let tool = write_tool(
        &dir,
        &format!(
            "echo row\nexec 1>&-\nsleep 1\necho done > '{}'\n",
            marker.display()
        ),
    );

    let mut relay = Relay::new(ProcessLauncher, "sh");
    let mut sink = RecordingSink::new();
    let session = session_for(&tool, "windows.pslist");

    // Same shape as the binary: the runtime goes away right after the run.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(relay.execute(&session, &mut sink))?;
    drop(rt);

    assert_eq!(relay.state(), RelayState::Finished);
    assert_eq!(relay.buffer().text(), "row\nExecution finished.\n");
    assert_eq!(std::fs::read_to_string(&marker)?, "done\n");
    Ok(())
}
