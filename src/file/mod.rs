//! File management module for Fileshelf.
//!
//! This module provides the storage side of the file drop:
//! - Flat storage directory access
//! - Collision-resistant stored names
//! - Streaming uploads with a size cap
//! - Listings with extension-derived metadata

pub mod kind;
pub mod listing;
pub mod naming;
pub mod storage;
pub mod upload;

pub use kind::{FileKind, Preview};
pub use listing::{list_files, public_path, FileEntry, PUBLIC_PREFIX};
pub use naming::{extension_of, generate_stored_name, sanitize_original_name, validate_request_name};
pub use storage::{ensure_directory, EntryStat, FileStorage, STAGING_DIR};
pub use upload::{StagedUpload, StoredFile};
