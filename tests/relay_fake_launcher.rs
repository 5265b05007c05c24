// tests/relay_fake_launcher.rs

mod common;
use crate::common::{init_tracing, with_timeout, TestResult};

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;

use volrelay::display::DisplayUpdate;
use volrelay::engine::{Relay, RelayState, FINISHED_MARKER};
use volrelay::errors::RelayError;
use volrelay_test_utils::builders::SessionBuilder;
use volrelay_test_utils::fake_launcher::FakeLauncher;
use volrelay_test_utils::recording_sink::RecordingSink;

#[tokio::test]
async fn n_lines_then_marker_and_full_progress() -> TestResult {
    init_tracing();

    let launcher = FakeLauncher::with_lines(7);
    let mut relay = Relay::new(launcher, "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    let summary = with_timeout(relay.execute(&session, &mut sink)).await?;

    let mut expected: Vec<String> = (1..=7).map(|i| format!("line {i}\n")).collect();
    expected.push(FINISHED_MARKER.to_string());
    assert_eq!(relay.buffer().lines(), expected.as_slice());
    assert_eq!(sink.shown_text(), relay.buffer().text());

    assert_eq!(summary.lines, 7);
    assert_eq!(summary.progress, 100);
    assert_eq!(relay.progress(), 100);
    assert_eq!(relay.state(), RelayState::Finished);
    Ok(())
}

#[tokio::test]
async fn progress_tracks_line_count_not_real_total() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_lines(3), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    // 0 on start, one value per line, then forced to 100.
    assert_eq!(sink.progress_values(), vec![0, 1, 2, 3, 100]);
    Ok(())
}

#[tokio::test]
async fn progress_saturates_before_completion() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_lines(150), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    let values = sink.progress_values();
    // values[k] is the estimate after k lines.
    assert_eq!(values[100], 100);
    assert!(values[101..=150].iter().all(|&p| p == 100));
    assert_eq!(relay.buffer().len(), 151);
    Ok(())
}

#[tokio::test]
async fn each_line_is_shown_before_its_progress() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_output("a\nb\n"), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    let tail: Vec<_> = sink
        .updates
        .iter()
        .skip_while(|u| !matches!(u, DisplayUpdate::AppendLine(_)))
        .cloned()
        .collect();
    assert_eq!(
        tail,
        vec![
            DisplayUpdate::AppendLine("a\n".to_string()),
            DisplayUpdate::Progress(1),
            DisplayUpdate::AppendLine("b\n".to_string()),
            DisplayUpdate::Progress(2),
            DisplayUpdate::Progress(100),
            DisplayUpdate::AppendLine(FINISHED_MARKER.to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn invocation_passes_only_the_routine_string() -> TestResult {
    init_tracing();

    let launcher = FakeLauncher::with_lines(1);
    let invocations = launcher.invocations();
    let mut relay = Relay::new(launcher, "/usr/bin/python3");
    let mut sink = RecordingSink::new();

    // OS family says linux; the routine is still passed through untouched.
    let session = SessionBuilder::complete()
        .os(volrelay::types::OsFamily::Linux)
        .routine("windows.malfind")
        .build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    let recorded = invocations.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].program, PathBuf::from("/usr/bin/python3"));
    assert_eq!(
        recorded[0].args,
        vec![
            OsString::from("/opt/volatility3/vol.py"),
            OsString::from("-f"),
            OsString::from("/cases/host.mem"),
            OsString::from("windows.malfind"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn status_notice_announces_routine() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_lines(1), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().routine("windows.netscan").build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    let notices = sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Executing windows.netscan...");
    assert!(!notices[0].is_error());
    // The status line is not part of the exportable output.
    assert!(!relay.buffer().text().contains("Executing"));
    Ok(())
}

#[tokio::test]
async fn spawn_failure_leaves_error_line_and_zero_progress() {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::failing_to_spawn(ErrorKind::NotFound), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    let err = with_timeout(relay.execute(&session, &mut sink))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Spawn { ref routine, .. } if routine == "windows.pslist"));
    assert_eq!(relay.state(), RelayState::Failed);
    assert_eq!(relay.progress(), 0);
    assert_eq!(
        relay.buffer().text(),
        "Error: fake launcher refused to spawn\n"
    );
    assert_eq!(sink.errors(), vec!["Failed to execute plugin windows.pslist"]);
    assert_eq!(sink.last_progress(), Some(0));
}

#[tokio::test]
async fn stream_failure_keeps_partial_output() {
    init_tracing();

    let launcher = FakeLauncher::failing_after("first\nsecond\n", ErrorKind::BrokenPipe);
    let mut relay = Relay::new(launcher, "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    let err = with_timeout(relay.execute(&session, &mut sink))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Stream { .. }));
    assert_eq!(relay.state(), RelayState::Failed);
    assert_eq!(relay.progress(), 0);
    assert_eq!(
        relay.buffer().text(),
        "first\nsecond\nError: fake stream broke\n"
    );
    assert!(!relay.buffer().text().contains(FINISHED_MARKER));
}

#[tokio::test]
async fn non_utf8_output_is_a_stream_failure() {
    init_tracing();

    let launcher = FakeLauncher::with_output(vec![b'o', b'k', b'\n', 0xff, b'\n']);
    let mut relay = Relay::new(launcher, "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    let err = with_timeout(relay.execute(&session, &mut sink))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Stream { .. }));
    assert_eq!(relay.buffer().lines()[0], "ok\n");
    assert!(relay.buffer().lines()[1].starts_with("Error: "));
}

#[tokio::test]
async fn failed_relay_accepts_a_new_invocation() {
    init_tracing();

    let launcher = FakeLauncher::failing_after("partial\n", ErrorKind::BrokenPipe);
    let mut relay = Relay::new(launcher.clone(), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    let _ = with_timeout(relay.execute(&session, &mut sink)).await;
    assert_eq!(relay.state(), RelayState::Failed);

    let _ = with_timeout(relay.execute(&session, &mut sink)).await;

    // The second run cleared the first run's output before starting.
    assert_eq!(launcher.launch_count(), 2);
    assert_eq!(relay.buffer().text(), "partial\nError: fake stream broke\n");
    assert_eq!(sink.shown_text(), relay.buffer().text());
}

#[tokio::test]
async fn repeated_runs_do_not_accumulate_output() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_lines(2), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    with_timeout(relay.execute(&session, &mut sink)).await?;
    with_timeout(relay.execute(&session, &mut sink)).await?;

    assert_eq!(relay.buffer().text(), "line 1\nline 2\nExecution finished.\n");
    Ok(())
}

#[tokio::test]
async fn unterminated_last_line_is_kept_verbatim() -> TestResult {
    init_tracing();

    let mut relay = Relay::new(FakeLauncher::with_output("a\nno newline"), "python3");
    let mut sink = RecordingSink::new();
    let session = SessionBuilder::complete().build();

    with_timeout(relay.execute(&session, &mut sink)).await?;

    assert_eq!(
        relay.buffer().text(),
        "a\nno newlineExecution finished.\n"
    );
    Ok(())
}
