//! Web module for Fileshelf.
//!
//! This module provides the JSON API, static serving of stored files and
//! the bundled browser UI.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
