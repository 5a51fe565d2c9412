//! Fileshelf - a small self-hosted file drop.
//!
//! A browser UI lists the files of one server-side directory and supports
//! upload, download, delete and image/video preview.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{Result, ShelfError};
pub use file::{FileEntry, FileStorage};
pub use web::WebServer;
