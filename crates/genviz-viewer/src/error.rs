//! Error types for viewer construction and lifecycle.
//!
//! Construction-time validation errors are fatal and surface to the caller;
//! everything after successful construction (late timers, dispatch faults,
//! stylesheet enumeration) is absorbed internally and never interrupts the
//! host.

use thiserror::Error;

/// Errors that can occur while constructing or operating a viewer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// A container id did not resolve to a known container.
    #[error("'{id}' is not a valid container id")]
    ContainerNotFound {
        /// The id that failed to resolve.
        id: String,
    },

    /// The family-to-color lookup is absent (empty).
    #[error("color lookup has no entries")]
    MissingColors,

    /// The dataset contains nothing to draw.
    #[error("dataset contains no genes")]
    EmptyDataset,

    /// An operation was attempted on a destroyed viewer.
    #[error("viewer has been destroyed")]
    Destroyed,
}

/// Result type using [`ViewerError`].
pub type Result<T> = std::result::Result<T, ViewerError>;
