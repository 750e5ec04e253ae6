//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur while building or sending a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint or input id does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Envelope could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] beacon_core::CoreError),

    /// Request never reached the endpoint.
    #[error("network error: {0}")]
    Network(String),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
