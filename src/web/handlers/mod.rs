//! API handlers for the web UI.

pub mod file;

pub use file::*;

use crate::file::FileStorage;

/// Shared application state.
///
/// Everything here is immutable; all mutable state lives in the storage
/// directory.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage directory accessor.
    pub storage: FileStorage,
    /// Upload cap in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(storage: FileStorage, max_upload_size: u64) -> Self {
        Self {
            storage,
            max_upload_size,
        }
    }
}
