//! Storage directory access for Fileshelf.
//!
//! All uploaded files live flat in one directory. This module wraps the
//! filesystem calls the rest of the crate needs:
//! - Ensure the directory exists
//! - List, stat and delete entries
//! - Resolve request names to paths inside the directory

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

use super::naming::validate_request_name;
use crate::{Result, ShelfError};

/// Hidden subdirectory holding uploads that are still being received.
pub const STAGING_DIR: &str = ".partial";

/// Metadata for a single storage entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Whether the entry is a directory.
    pub is_directory: bool,
}

/// Accessor for the storage directory.
///
/// ```text
/// {base_path}/
/// ├── 1717171717171-482913-report.txt
/// ├── 1717171718000-90210-photo.jpg
/// └── .partial/        (in-flight uploads)
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Open storage at the given path, creating the directory if needed.
    ///
    /// Staged uploads left behind by a previous run are removed.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        ensure_directory(&base_path).await?;

        let storage = Self { base_path };
        storage.sweep_staging().await?;
        Ok(storage)
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory used for in-flight uploads.
    pub fn staging_path(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }

    /// Remove every file in the staging directory.
    ///
    /// Only safe while no upload is in flight. Returns the number of files
    /// removed.
    pub async fn sweep_staging(&self) -> Result<usize> {
        let staging = self.staging_path();
        let mut dir = match fs::read_dir(&staging).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(ShelfError::storage("read staging directory", e)),
        };

        let mut removed = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| ShelfError::storage("read staging directory", e))?
        {
            let path = entry.path();
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove stale upload"
                ),
            }
        }

        if removed > 0 {
            tracing::info!("Removed {} stale upload(s) from {}", removed, staging.display());
        }
        Ok(removed)
    }

    /// Resolve a request filename to a path inside the storage directory.
    ///
    /// Names with separators or parent references are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let name = validate_request_name(name)?;
        Ok(self.base_path.join(name))
    }

    /// List entry names in directory enumeration order.
    ///
    /// Names that are not valid UTF-8 are skipped.
    pub async fn list_entries(&self) -> Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| ShelfError::storage("read storage directory", e))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| ShelfError::storage("read storage directory", e))?
        {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!(name = ?raw, "Skipping entry with non UTF-8 name"),
            }
        }

        Ok(names)
    }

    /// Stat a single entry.
    pub async fn stat_entry(&self, name: &str) -> Result<EntryStat> {
        let path = self.resolve(name)?;

        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ShelfError::NotFound(name.to_string()))
            }
            Err(e) => return Err(ShelfError::storage(format!("stat {name}"), e)),
        };

        let modified = meta
            .modified()
            .map_err(|e| ShelfError::storage(format!("read mtime of {name}"), e))?;

        Ok(EntryStat {
            size: meta.len(),
            modified: DateTime::<Utc>::from(modified),
            is_directory: meta.is_dir(),
        })
    }

    /// Delete a regular file.
    ///
    /// Fails with `IsDirectory` for directories and `NotFound` when the
    /// entry is already gone.
    pub async fn delete_entry(&self, name: &str) -> Result<()> {
        let stat = self.stat_entry(name).await?;
        if stat.is_directory {
            return Err(ShelfError::IsDirectory(name.to_string()));
        }

        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(name.to_string()))
            }
            Err(e) => Err(ShelfError::storage(format!("delete {name}"), e)),
        }
    }

    /// Check if an entry exists.
    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Create `path` as a directory if it is absent.
///
/// Fails if something other than a directory already occupies the path.
pub async fn ensure_directory(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ShelfError::storage(
            format!("create {}", path.display()),
            io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => fs::create_dir_all(path)
            .await
            .map_err(|e| ShelfError::storage(format!("create {}", path.display()), e)),
        Err(e) => Err(ShelfError::storage(format!("stat {}", path.display()), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path()).await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("files");

        assert!(!storage_path.exists());

        let storage = FileStorage::open(&storage_path).await.unwrap();

        assert!(storage_path.is_dir());
        assert_eq!(storage.base_path(), storage_path);
    }

    #[tokio::test]
    async fn test_open_sweeps_stale_uploads() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.path().join(STAGING_DIR);
        std::fs::create_dir(&staging).unwrap();
        std::fs::write(staging.join("left-over.part"), b"half").unwrap();
        std::fs::write(temp_dir.path().join("1-2-kept.txt"), b"kept").unwrap();

        let storage = FileStorage::open(temp_dir.path()).await.unwrap();

        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
        assert!(storage.exists("1-2-kept.txt").await);
        assert_eq!(storage.sweep_staging().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_directory_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("files");

        ensure_directory(&path).await.unwrap();
        ensure_directory(&path).await.unwrap();

        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_directory_rejects_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("occupied");
        std::fs::write(&path, b"x").unwrap();

        let result = ensure_directory(&path).await;

        assert!(matches!(result, Err(ShelfError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_list_entries() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::write(temp_dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), b"b").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let mut names = storage.list_entries().await.unwrap();
        names.sort();

        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
    }

    #[tokio::test]
    async fn test_list_entries_missing_directory() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::remove_dir(temp_dir.path()).unwrap();

        let result = storage.list_entries().await;

        assert!(matches!(result, Err(ShelfError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_stat_entry() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::write(temp_dir.path().join("hello.txt"), b"hello world").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let stat = storage.stat_entry("hello.txt").await.unwrap();
        assert_eq!(stat.size, 11);
        assert!(!stat.is_directory);

        let stat = storage.stat_entry("sub").await.unwrap();
        assert!(stat.is_directory);
    }

    #[tokio::test]
    async fn test_stat_entry_not_found() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.stat_entry("gone.txt").await;

        assert!(matches!(result, Err(ShelfError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::write(temp_dir.path().join("bye.txt"), b"bye").unwrap();
        assert!(storage.exists("bye.txt").await);

        storage.delete_entry("bye.txt").await.unwrap();

        assert!(!storage.exists("bye.txt").await);
        assert!(matches!(
            storage.delete_entry("bye.txt").await,
            Err(ShelfError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_entry_directory() {
        let (temp_dir, storage) = setup_storage().await;
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let result = storage.delete_entry("sub").await;

        assert!(matches!(result, Err(ShelfError::IsDirectory(_))));
        assert!(temp_dir.path().join("sub").is_dir());
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let (_temp_dir, storage) = setup_storage().await;

        assert!(storage.resolve("report.txt").is_ok());
        assert!(matches!(
            storage.resolve("../report.txt"),
            Err(ShelfError::Validation(_))
        ));
        assert!(!storage.exists("..").await);
    }
}
