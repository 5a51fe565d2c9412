//! Response DTOs for the web API.

use serde::Serialize;

use crate::file::{public_path, StoredFile};

/// Plain acknowledgement, e.g. after a delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Details of an accepted upload.
#[derive(Debug, Serialize)]
pub struct UploadedFileInfo {
    /// Filename as sent by the client.
    pub originalname: String,
    /// Name the file was stored under.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub mimetype: String,
    /// Public URL path.
    pub path: String,
}

impl UploadedFileInfo {
    /// Describe a stored upload.
    pub fn new(original_name: String, stored: StoredFile, mimetype: String) -> Self {
        Self {
            originalname: original_name,
            path: public_path(&stored.stored_name),
            filename: stored.stored_name,
            size: stored.size,
            mimetype,
        }
    }
}

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable message.
    pub message: String,
    /// The stored file.
    pub file: UploadedFileInfo,
}
