//! Directory listing with derived metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::kind::{FileKind, Preview};
use super::naming::extension_of;
use super::storage::{EntryStat, FileStorage};
use crate::{Result, ShelfError};

/// URL prefix under which stored files are served statically.
pub const PUBLIC_PREFIX: &str = "/files";

/// One stored file as shown to the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Stored filename.
    pub name: String,
    /// Public URL path of the file.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Lowercase extension, or `"file"`.
    #[serde(rename = "type")]
    pub file_type: String,
    /// Always false; directories never make it into a listing.
    pub is_directory: bool,
    /// Icon identifier for the UI.
    pub icon: &'static str,
    /// Inline preview kind.
    pub preview: Preview,
}

impl FileEntry {
    /// Build an entry from a stored name and its stat.
    pub fn new(name: String, stat: &EntryStat) -> Self {
        let file_type = extension_of(&name);
        Self {
            path: public_path(&name),
            size: stat.size,
            modified: stat.modified,
            icon: FileKind::from_extension(&file_type).icon(),
            preview: Preview::from_extension(&file_type),
            file_type,
            is_directory: false,
            name,
        }
    }
}

/// Public URL path for a stored name.
pub fn public_path(name: &str) -> String {
    format!("{PUBLIC_PREFIX}/{}", urlencoding::encode(name))
}

/// List every regular file in storage.
///
/// Directories are skipped. An entry that cannot be stat'ed (usually
/// because it was deleted after enumeration) is left out instead of
/// failing the whole listing.
pub async fn list_files(storage: &FileStorage) -> Result<Vec<FileEntry>> {
    let names = storage.list_entries().await?;

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        match storage.stat_entry(&name).await {
            Ok(stat) if stat.is_directory => {}
            Ok(stat) => entries.push(FileEntry::new(name, &stat)),
            Err(ShelfError::NotFound(_)) => {
                tracing::debug!(name = %name, "Entry vanished during listing");
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Skipping unreadable entry");
            }
        }
    }

    Ok(entries)
}
