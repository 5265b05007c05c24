// src/engine/mod.rs

//! Execution relay engine.
//!
//! The pure state machine lives in [`core`]; the async/IO shell that launches
//! the tool and pumps its output through the core is implemented in
//! [`runtime`].
//!
//! Lifecycle of one execution:
//!
//! ```text
//! Idle -> Running -> Finished
//!                 \-> Failed
//! ```
//!
//! A new invocation from `Finished` or `Failed` goes straight back to
//! `Running`. There is no retry and no cancellation of a run in flight.

pub mod buffer;
pub mod core;
pub mod progress;
pub mod runtime;

/// Where the relay is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayState {
    #[default]
    Idle,
    Running,
    Finished,
    Failed,
}

/// Events flowing into the relay core from the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Preconditions passed; a routine is about to be launched.
    Started { routine: String },
    /// One stdout line, terminator included.
    LineReceived(String),
    /// Stdout reached end-of-stream.
    StreamEnded,
    /// Launching or reading failed.
    Failed { description: String },
}

pub use buffer::OutputBuffer;
pub use core::{FINISHED_MARKER, RelayCore, RelayStep};
pub use progress::{LINE_DENOMINATOR, LineProgress};
pub use runtime::{Relay, RunSummary};
