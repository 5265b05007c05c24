// src/display/mod.rs

//! Display side of the relay.
//!
//! The relay never talks to a terminal (or any other surface) directly: it
//! pushes [`DisplayUpdate`]s into a [`DisplaySink`]. Production uses
//! [`TerminalSink`]; tests record updates instead.

pub mod terminal;

pub use terminal::TerminalSink;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message outside the output buffer (status, dialogs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// One change the display must reflect, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// Drop everything shown so far (start of a new execution).
    Clear,
    /// Append text verbatim, line terminator included.
    AppendLine(String),
    /// New progress value, 0..=100.
    Progress(u8),
    Notify(Notice),
}

/// Receiver of relay output.
///
/// Calls arrive in the order the relay produced them; a line is always
/// delivered before the next one is read from the child.
pub trait DisplaySink {
    fn clear(&mut self) {}

    fn append_line(&mut self, line: &str);

    fn set_progress(&mut self, percent: u8);

    fn notify(&mut self, notice: &Notice);

    fn apply(&mut self, update: &DisplayUpdate) {
        match update {
            DisplayUpdate::Clear => self.clear(),
            DisplayUpdate::AppendLine(line) => self.append_line(line),
            DisplayUpdate::Progress(p) => self.set_progress(*p),
            DisplayUpdate::Notify(notice) => self.notify(notice),
        }
    }
}
