//! Configuration module for Fileshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShelfError};

/// Environment variable overriding the listening port.
pub const ENV_PORT: &str = "FILESHELF_PORT";
/// Environment variable overriding the storage directory.
pub const ENV_STORAGE_PATH: &str = "FILESHELF_STORAGE_PATH";
/// Environment variable naming the config file to load.
pub const ENV_CONFIG: &str = "FILESHELF_CONFIG";

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the storage directory. Created on startup if missing.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "./files".to_string()
}

const BYTES_PER_MB: u64 = 1024 * 1024;

fn default_max_upload_size() -> u64 {
    10
}

impl StorageConfig {
    /// Upload cap in bytes, or `None` when the megabyte value overflows.
    pub fn checked_max_upload_bytes(&self) -> Option<u64> {
        self.max_upload_size_mb.checked_mul(BYTES_PER_MB)
    }

    /// Upload cap in bytes. Saturates instead of overflowing; `validate`
    /// rejects values where that would matter.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Web UI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory holding the bundled browser UI.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
            cors_origins: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web UI configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShelfError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShelfError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILESHELF_PORT`: listening port
    /// - `FILESHELF_STORAGE_PATH`: storage directory
    ///
    /// Returns a warning for each override that could not be applied.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warnings.push(format!("ignoring {ENV_PORT}={port}: not a valid port")),
            }
        }

        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|v| !v.trim().is_empty()) {
            self.storage.path = path;
        }

        warnings
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The storage path is empty
    /// - The upload cap is zero or does not fit in bytes
    pub fn validate(&self) -> Result<()> {
        if self.storage.path.trim().is_empty() {
            return Err(ShelfError::Config("storage.path must not be empty".to_string()));
        }
        if self.storage.max_upload_size_mb == 0 {
            return Err(ShelfError::Config(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.storage.checked_max_upload_bytes().is_none() {
            return Err(ShelfError::Config(format!(
                "storage.max_upload_size_mb is too large: {}",
                self.storage.max_upload_size_mb
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);

        assert_eq!(config.storage.path, "./files");
        assert_eq!(config.storage.max_upload_size_mb, 10);
        assert_eq!(config.storage.max_upload_bytes(), 10 * 1024 * 1024);

        assert_eq!(config.web.static_path, "public");
        assert!(config.web.cors_origins.is_empty());

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[storage]
path = "/srv/shelf"
max_upload_size_mb = 25

[web]
static_path = "ui"
cors_origins = ["http://localhost:5173"]

[logging]
level = "debug"
file = "logs/fileshelf.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.path, "/srv/shelf");
        assert_eq!(config.storage.max_upload_size_mb, 25);
        assert_eq!(config.web.static_path, "ui");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "logs/fileshelf.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 4000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.path, "./files");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("[server\nport = ");
        assert!(matches!(result, Err(ShelfError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("does/not/exist.toml");
        assert!(matches!(result, Err(ShelfError::Io(_))));
    }

    #[test]
    fn test_overrides_applied() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_PORT, "8081"), (ENV_STORAGE_PATH, "/tmp/shelf")]);
        let mut config = Config::default();

        let warnings = config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert!(warnings.is_empty());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.storage.path, "/tmp/shelf");
    }

    #[test]
    fn test_overrides_invalid_port_warns() {
        let mut config = Config::default();

        let warnings = config.apply_overrides_from(|k| {
            (k == ENV_PORT).then(|| "not-a-port".to_string())
        });

        assert_eq!(warnings.len(), 1);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_overrides_empty_value_ignored() {
        let mut config = Config::default();

        let warnings = config.apply_overrides_from(|_| Some(String::new()));

        assert!(warnings.is_empty());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.path, "./files");
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;
        assert!(matches!(config.validate(), Err(ShelfError::Config(_))));

        let mut config = Config::default();
        config.storage.path = "  ".to_string();
        assert!(matches!(config.validate(), Err(ShelfError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_overflowing_upload_cap() {
        let config = Config::parse("[storage]\nmax_upload_size_mb = 17592186044416").unwrap();

        assert!(matches!(config.validate(), Err(ShelfError::Config(_))));
        assert_eq!(config.storage.max_upload_bytes(), u64::MAX);
    }

    #[test]
    fn test_validate_accepts_largest_upload_cap() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = u64::MAX / (1024 * 1024);

        assert!(config.validate().is_ok());
        assert!(config.storage.checked_max_upload_bytes().is_some());
    }
}
