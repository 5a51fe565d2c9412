//! Keeps in-flight uploads out of static file serving.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::file::STAGING_DIR;

/// Whether any segment of a request path names the staging directory.
///
/// Segments are percent-decoded first, so `%2Epartial` is caught as well.
/// Undecodable segments are treated as hidden.
pub fn targets_staging(path: &str) -> bool {
    path.split('/').any(|segment| match urlencoding::decode(segment) {
        Ok(decoded) => decoded == STAGING_DIR,
        Err(_) => true,
    })
}

/// Answer 404 for requests that reach into the staging directory.
pub async fn hide_staging(req: Request<Body>, next: Next) -> Response {
    if targets_staging(req.uri().path()) {
        tracing::debug!(path = %req.uri().path(), "Refusing staging path");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}
