//! Error types for the core crate.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while manipulating tool state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A custom deck, template, or save was referenced by an unknown id.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of record was looked up ("deck", "template", "save").
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// A custom deck failed validation.
    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    /// A game template failed validation.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
}

impl CoreError {
    /// Shorthand for a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
