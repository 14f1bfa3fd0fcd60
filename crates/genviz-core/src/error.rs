//! Error handling for the genviz core crate.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors produced while constructing or parsing highlight events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A target list was constructed with no identifiers in it.
    #[error("highlight target resolves to no identifiers")]
    EmptyTargetList,

    /// An action string did not name a known highlight action.
    #[error("unknown highlight action: {action}")]
    UnknownAction {
        /// The string that failed to parse.
        action: String,
    },
}

/// Result type using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
