// src/display/terminal.rs

//! Terminal rendition of the relay display.
//!
//! - Tool output goes to stdout, verbatim, flushed per line.
//! - The progress bar and notices go to stderr, so stdout can be piped.

use std::io::{self, IsTerminal, Stderr, Stdout, Write};

use tracing::debug;

use super::{DisplaySink, Notice, NoticeLevel};

const BAR_WIDTH: usize = 20;

pub struct TerminalSink<O: Write, E: Write> {
    out: O,
    err: E,
    render_progress: bool,
    bar_drawn: bool,
}

impl TerminalSink<Stdout, Stderr> {
    /// Sink on the process's stdout/stderr.
    ///
    /// The progress bar is only drawn when stderr is a terminal.
    pub fn stdio() -> Self {
        let render_progress = io::stderr().is_terminal();
        Self::new(io::stdout(), io::stderr(), render_progress)
    }
}

impl<O: Write, E: Write> TerminalSink<O, E> {
    pub fn new(out: O, err: E, render_progress: bool) -> Self {
        Self {
            out,
            err,
            render_progress,
            bar_drawn: false,
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    fn erase_bar(&mut self) {
        if self.bar_drawn {
            report(write!(self.err, "\r\x1b[2K"));
            self.bar_drawn = false;
        }
    }
}

/// `[##########          ]  50%`
pub fn render_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        percent
    )
}

impl<O: Write, E: Write> DisplaySink for TerminalSink<O, E> {
    fn append_line(&mut self, line: &str) {
        self.erase_bar();
        report(self.out.write_all(line.as_bytes()));
        report(self.out.flush());
    }

    fn set_progress(&mut self, percent: u8) {
        if !self.render_progress {
            return;
        }
        report(write!(self.err, "\r{}", render_bar(percent)));
        report(self.err.flush());
        self.bar_drawn = true;
    }

    fn notify(&mut self, notice: &Notice) {
        self.erase_bar();
        let res = match notice.level {
            NoticeLevel::Error => writeln!(self.err, "error: {}", notice.message),
            NoticeLevel::Info => writeln!(self.err, "{}: {}", notice.title, notice.message),
        };
        report(res);
    }
}

fn report(res: io::Result<()>) {
    if let Err(e) = res {
        debug!(error = %e, "terminal write failed");
    }
}
