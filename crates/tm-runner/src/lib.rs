//! Game template runner.
//!
//! Turns a [`tm_core::GameTemplate`] into a live play-through: a cursor
//! over phases and steps, setup variables bound once at the start, action
//! execution against the shared [`tm_core::ToolStates`], and an append-only
//! session log with a grouped display view.
//!
//! Sequencing is infinite: advancing past the last step of the last phase
//! wraps back to the first phase and bumps the cycle count, matching how
//! round-structured board games actually loop.

/// Runner error types.
pub mod error;
/// The session log and its display grouping.
pub mod log;
/// The running session: position, variables, execution, and navigation.
pub mod session;

pub use error::{RunnerError, RunnerResult};
pub use log::{LogEntry, LogItem, grouped};
pub use session::{RunnerSession, StepOutcome, StepStatus};
