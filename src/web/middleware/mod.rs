//! Middleware for the web API.

pub mod cors;
pub mod security;
pub mod staging;

pub use cors::create_cors_layer;
pub use security::security_headers;
pub use staging::hide_staging;
