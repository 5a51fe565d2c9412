//! Web server for Fileshelf.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::file::FileStorage;
use crate::{Result, ShelfError};

use super::handlers::AppState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server serving the API, stored files and the bundled UI.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
    /// Directory holding the browser UI.
    static_path: String,
}

impl WebServer {
    /// Create a new web server, opening (and creating) the storage directory.
    pub async fn new(config: &Config) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                ShelfError::Config(format!(
                    "invalid listen address {}:{}: {e}",
                    config.server.host, config.server.port
                ))
            })?;

        let storage = FileStorage::open(&config.storage.path).await?;
        tracing::info!("File storage initialized at: {}", storage.base_path().display());

        let app_state = AppState::new(storage, config.storage.max_upload_bytes());

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.web.cors_origins.clone(),
            static_path: config.web.static_path.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        let mut router = create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router());

        if let Some(static_router) = create_static_router(&self.static_path) {
            router = router.merge(static_router);
        }

        router.layer(CompressionLayer::new())
    }

    async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", self.addr.port());
            }
            e
        })
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();
        let listener = self.bind().await?;

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
