//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_file, download_file, list_files, upload_file, AppState};
use super::middleware::{create_cors_layer, hide_staging, security_headers};
use crate::file::PUBLIC_PREFIX;

/// Room left in the request body limit for multipart boundaries and headers.
pub const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Create the main API router.
///
/// Serves the JSON API under `/api` and the stored files under `/files`.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit =
        usize::try_from(app_state.max_upload_size.saturating_add(MULTIPART_OVERHEAD))
            .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .route("/files", get(list_files))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/download/:filename", get(download_file))
        .route("/delete/:filename", delete(delete_file))
        .layer(middleware::from_fn(security_headers));

    let stored_files = Router::new()
        .nest_service(PUBLIC_PREFIX, ServeDir::new(app_state.storage.base_path()))
        .layer(middleware::from_fn(hide_staging));

    Router::new()
        .nest("/api", api_routes)
        .merge(stored_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a router serving the bundled browser UI.
///
/// Directory requests (including `/`) are answered with their `index.html`.
///
/// Returns `None` when the UI directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let root = Path::new(static_path);
    if !root.is_dir() {
        tracing::warn!("UI directory not found: {}", static_path);
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(root)))
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
