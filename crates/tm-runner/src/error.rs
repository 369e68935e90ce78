//! Runner error types.

use uuid::Uuid;

/// Result alias for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Why a runner operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// A template with no phases cannot be run.
    #[error("template has no phases")]
    NoPhases,

    /// The current step already has a result; advance past it instead.
    #[error("step has already been executed")]
    AlreadyExecuted,

    /// A typed count must be a positive number.
    #[error("count must be positive, got {0}")]
    InvalidCount(i64),

    /// A cards step referenced a custom deck that no longer exists.
    #[error("custom deck {0} not found")]
    DeckNotFound(Uuid),

    /// Execute was called on a step with nothing to execute.
    #[error("current step is not an action step")]
    NotAnAction,
}
