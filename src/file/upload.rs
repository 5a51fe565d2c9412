//! Streaming upload staging.
//!
//! An upload is written to `.partial/<uuid>.part` while it arrives and only
//! linked into the storage directory once it is complete. Publishing never
//! replaces an existing file. If the upload is
//! abandoned for any reason (size cap, client gone, write error) the staged
//! file is removed when the `StagedUpload` is dropped.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::naming::generate_stored_name;
use super::storage::{ensure_directory, FileStorage};
use crate::{Result, ShelfError};

/// Attempts at finding a free stored name before giving up.
const MAX_NAME_ATTEMPTS: usize = 5;

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name under which the file was stored.
    pub stored_name: String,
    /// Number of bytes written.
    pub size: u64,
}

/// An upload being received into the staging directory.
#[derive(Debug)]
pub struct StagedUpload {
    file: Option<File>,
    temp_path: PathBuf,
    written: u64,
    limit: u64,
    committed: bool,
}

impl StagedUpload {
    /// Start a new staged upload capped at `limit` bytes.
    pub async fn create(storage: &FileStorage, limit: u64) -> Result<Self> {
        let staging = storage.staging_path();
        ensure_directory(&staging).await?;

        let temp_path = staging.join(format!("{}.part", Uuid::new_v4()));
        let file = File::create(&temp_path)
            .await
            .map_err(|e| ShelfError::storage("create staging file", e))?;

        Ok(Self {
            file: Some(file),
            temp_path,
            written: 0,
            limit,
            committed: false,
        })
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append a chunk, enforcing the size cap.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let next = self.written + chunk.len() as u64;
        if next > self.limit {
            return Err(ShelfError::PayloadTooLarge { limit: self.limit });
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ShelfError::Validation("upload already finished".to_string()))?;
        file.write_all(chunk)
            .await
            .map_err(|e| ShelfError::storage("write staging file", e))?;

        self.written = next;
        Ok(())
    }

    /// Publish the finished upload under a fresh stored name.
    pub async fn commit(mut self, storage: &FileStorage, original_name: &str) -> Result<StoredFile> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| ShelfError::storage("flush staging file", e))?;
        }

        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = generate_stored_name(original_name);
            let target = storage.resolve(&stored_name)?;

            if !publish_no_clobber(&self.temp_path, &target)
                .await
                .map_err(|e| ShelfError::storage(format!("store {stored_name}"), e))?
            {
                tracing::debug!(name = %stored_name, "Stored name taken, drawing another");
                continue;
            }

            self.committed = true;
            if let Err(e) = fs::remove_file(&self.temp_path).await {
                tracing::warn!(
                    path = %self.temp_path.display(),
                    error = %e,
                    "Failed to remove staging link"
                );
            }

            return Ok(StoredFile {
                stored_name,
                size: self.written,
            });
        }

        Err(ShelfError::storage(
            "pick stored name",
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "stored name collision"),
        ))
    }
}

/// Link `temp` into place at `target` without replacing an existing file.
///
/// Returns `Ok(false)` when `target` is already taken.
async fn publish_no_clobber(temp: &Path, target: &Path) -> std::io::Result<bool> {
    match fs::hard_link(temp, target).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close the handle before unlinking.
        self.file.take();
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.temp_path.display(),
                    error = %e,
                    "Failed to remove abandoned upload"
                );
            }
        }
    }
}
