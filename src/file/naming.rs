//! Stored-name generation and filename rules.
//!
//! Uploaded files are stored flat, as `<epochMillis>-<random>-<originalName>`.
//! The prefix keeps names unique per directory while the original name stays
//! readable in listings and downloads.

use rand::Rng;

use crate::{Result, ShelfError};

/// Upper bound (inclusive) for the random component of a stored name.
pub const MAX_RANDOM_COMPONENT: u32 = 1_000_000_000;

/// Type reported for names without an extension.
pub const NO_EXTENSION_TYPE: &str = "file";

/// Generate a fresh stored name for an uploaded file.
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = rand::rng().random_range(0..=MAX_RANDOM_COMPONENT);
    stored_name_from_parts(millis, random, original_name)
}

/// Build a stored name from its parts.
pub fn stored_name_from_parts(millis: i64, random: u32, original_name: &str) -> String {
    format!("{millis}-{random}-{original_name}")
}

/// Lowercased extension of `name`, or `"file"` when there is none.
///
/// The extension is whatever follows the last `.`; a leading dot alone
/// (`.bashrc`) or a trailing dot (`notes.`) does not count.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[idx + 1..].to_lowercase(),
        _ => NO_EXTENSION_TYPE.to_string(),
    }
}

/// Check a filename taken from a request path.
///
/// Only plain names directly inside the storage directory are accepted.
pub fn validate_request_name(name: &str) -> Result<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(ShelfError::Validation(format!("invalid file name: {name:?}")));
    }
    Ok(name)
}

/// Reduce a client-supplied upload filename to a safe final component.
///
/// Browsers on some platforms send the full client path, so anything up to
/// the last `/` or `\` is dropped.
pub fn sanitize_original_name(raw: &str) -> Result<String> {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace('\0', "");

    if base.is_empty() || base == "." || base == ".." {
        return Err(ShelfError::Validation("invalid file name".to_string()));
    }
    Ok(base)
}
