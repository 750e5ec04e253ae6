//! Error types for the tracker.

use beacon_core::CoreError;
use beacon_store::StoreError;
use beacon_transport::TransportError;
use thiserror::Error;

/// Errors that can occur while assembling or configuring a tracker.
///
/// Queue and command execution never surface these; they are logged instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Core encoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The selected transport needs a tokio runtime and none was available.
    #[error("no tokio runtime available for asynchronous delivery")]
    NoRuntime,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
