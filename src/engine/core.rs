// src/engine/core.rs

//! Pure relay state machine.
//!
//! [`RelayCore`] consumes [`RelayEvent`]s and returns the [`DisplayUpdate`]s
//! the IO shell must forward to the display, in order. It owns:
//! - the execution state (`Idle -> Running -> {Finished, Failed}`)
//! - the output buffer
//! - the line-count progress estimate
//!
//! It has no Tokio types, spawns nothing and does not perform any IO, so the
//! relay semantics can be tested without processes.

use tracing::warn;

use crate::display::{DisplayUpdate, Notice};
use crate::engine::buffer::OutputBuffer;
use crate::engine::progress::LineProgress;
use crate::engine::{RelayEvent, RelayState};

/// Appended once the tool's output stream ends.
pub const FINISHED_MARKER: &str = "Execution finished.\n";

/// Updates produced by a single event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStep {
    pub updates: Vec<DisplayUpdate>,
}

#[derive(Debug, Default)]
pub struct RelayCore {
    state: RelayState,
    routine: Option<String>,
    buffer: OutputBuffer,
    progress: LineProgress,
}

impl RelayCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn buffer(&self) -> &OutputBuffer {
        &self.buffer
    }

    pub fn progress(&self) -> u8 {
        self.progress.percent()
    }

    pub fn lines_received(&self) -> usize {
        self.progress.lines()
    }

    /// Handle one event, returning what the display must show.
    pub fn step(&mut self, event: RelayEvent) -> RelayStep {
        match event {
            RelayEvent::Started { routine } => self.start(routine),
            RelayEvent::LineReceived(line) => {
                if !self.expect_running("line") {
                    return RelayStep::default();
                }
                self.buffer.push(line.clone());
                let percent = self.progress.record_line();
                RelayStep {
                    updates: vec![
                        DisplayUpdate::AppendLine(line),
                        DisplayUpdate::Progress(percent),
                    ],
                }
            }
            RelayEvent::StreamEnded => {
                if !self.expect_running("end of stream") {
                    return RelayStep::default();
                }
                self.state = RelayState::Finished;
                let percent = self.progress.complete();
                self.buffer.push(FINISHED_MARKER);
                RelayStep {
                    updates: vec![
                        DisplayUpdate::Progress(percent),
                        DisplayUpdate::AppendLine(FINISHED_MARKER.to_string()),
                    ],
                }
            }
            RelayEvent::Failed { description } => {
                if !self.expect_running("failure") {
                    return RelayStep::default();
                }
                self.state = RelayState::Failed;
                let line = format!("Error: {description}\n");
                self.buffer.push(line.clone());
                let routine = self.routine.as_deref().unwrap_or_default();
                let percent = self.progress.reset();
                RelayStep {
                    updates: vec![
                        DisplayUpdate::AppendLine(line),
                        DisplayUpdate::Notify(Notice::error(format!(
                            "Failed to execute plugin {routine}"
                        ))),
                        DisplayUpdate::Progress(percent),
                    ],
                }
            }
        }
    }

    fn start(&mut self, routine: String) -> RelayStep {
        if self.state == RelayState::Running {
            warn!(
                routine = %routine,
                "start requested while a run is active; restarting relay state"
            );
        }
        self.state = RelayState::Running;
        self.progress = LineProgress::new();
        self.buffer.clear();
        let notice = Notice::info("Status", format!("Executing {routine}..."));
        self.routine = Some(routine);
        RelayStep {
            updates: vec![
                DisplayUpdate::Progress(0),
                DisplayUpdate::Clear,
                DisplayUpdate::Notify(notice),
            ],
        }
    }

    fn expect_running(&self, what: &str) -> bool {
        if self.state == RelayState::Running {
            return true;
        }
        warn!(state = ?self.state, event = what, "ignoring relay event outside a run");
        false
    }
}
