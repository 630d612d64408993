//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data file exists but is not a valid snapshot
    #[error("Corrupt data file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Store misconfigured
    #[error("Storage configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Get a client-safe error message that doesn't leak paths or SQL
    pub fn client_message(&self) -> String {
        match self {
            StorageError::Database(_) => "Internal storage error".to_string(),
            StorageError::Io(_) | StorageError::Corrupt { .. } => {
                "Data file could not be read or written".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
