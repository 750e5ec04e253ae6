//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Property map could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted blob is not a JSON object.
    #[error("corrupt slot {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding backend state was poisoned.
    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
