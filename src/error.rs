//! Error types for Fileshelf.

use thiserror::Error;

/// Common error type for Fileshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Validation error for client input (missing upload, bad filename).
    #[error("validation error: {0}")]
    Validation(String),

    /// Entry does not exist in the storage directory.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation is not valid on a directory.
    #[error("{0} is a directory")]
    IsDirectory(String),

    /// Upload exceeded the configured size cap.
    #[error("payload too large (limit {limit} bytes)")]
    PayloadTooLarge {
        /// The cap in bytes.
        limit: u64,
    },

    /// Storage operation failed at the OS level.
    #[error("storage error: {context}: {source}")]
    Storage {
        /// What the storage layer was doing.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// Wrap an I/O error with a short description of the failed operation.
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        ShelfError::Storage {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias for Fileshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
