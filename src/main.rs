use std::process::ExitCode;

use tracing::info;

use fileshelf::config::ENV_CONFIG;
use fileshelf::{Config, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::var(ENV_CONFIG).unwrap_or_else(|_| "config.toml".to_string());

    // Load configuration
    let mut config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    for warning in config.apply_env_overrides() {
        eprintln!("{warning}");
    }

    // Initialize logging
    if let Err(e) = fileshelf::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        fileshelf::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("Fileshelf {}", env!("CARGO_PKG_VERSION"));

    let server = match WebServer::new(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
