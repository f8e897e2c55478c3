//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub edge: EdgeConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Edge server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built frontend
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Entry document served for unmatched navigational paths
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Origin that proxied requests are forwarded to
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Path prefixes forwarded to the upstream
    #[serde(default = "default_proxy_prefixes")]
    pub proxy_prefixes: Vec<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_upstream_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Mount point for the health endpoints; unset leaves every non-API
    /// path to the frontend
    #[serde(default)]
    pub health_path: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/dist/frontend")
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_proxy_prefixes() -> Vec<String> {
    vec!["/api".to_string(), "/test_api".to_string()]
}

fn default_connect_timeout() -> u64 {
    5_000
}

fn default_upstream_timeout() -> u64 {
    30_000
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            upstream_url: default_upstream_url(),
            proxy_prefixes: default_proxy_prefixes(),
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_upstream_timeout(),
            max_body_size: default_max_body_size(),
            health_path: None,
        }
    }
}

impl EdgeConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the entry document
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

/// Tee-time client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL the tee-time paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_client_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_client_timeout() -> u64 {
    30_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_client_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Files that fail to load are skipped with a warning, so run this under
    /// [`crate::logging::bootstrap`] when no subscriber is installed yet.
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("teebox").join("config.toml")),
            Some(PathBuf::from("/etc/teebox/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First of `paths` that exists and parses, otherwise environment only
    pub(crate) fn load_first(paths: &[PathBuf]) -> Self {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Explicit file if given, otherwise the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Edge overrides
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(p) => self.edge.port = p,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(host) = lookup("TEEBOX_HOST") {
            self.edge.host = host;
        }
        if let Some(url) = lookup("TEEBOX_UPSTREAM_URL") {
            self.edge.upstream_url = url;
        }
        if let Some(dir) = lookup("TEEBOX_STATIC_DIR") {
            self.edge.static_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("TEEBOX_HEALTH_PATH") {
            self.edge.health_path = Some(path);
        }

        // Client overrides
        if let Some(base) = lookup("TEEBOX_API_BASE") {
            self.client.base_url = base;
        }

        // Logging overrides
        if let Some(level) = lookup("TEEBOX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TEEBOX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Teebox Configuration
#
# Environment variables override these settings:
# - PORT
# - TEEBOX_HOST
# - TEEBOX_UPSTREAM_URL
# - TEEBOX_STATIC_DIR
# - TEEBOX_HEALTH_PATH
# - TEEBOX_API_BASE
# - TEEBOX_LOG_LEVEL
# - TEEBOX_LOG_FORMAT

[edge]
# Address the edge server binds to
host = "0.0.0.0"
port = 5000

# Built frontend and its entry document
static_dir = "frontend/dist/frontend"
index_file = "index.html"

# Booking API that /api and /test_api are forwarded to
upstream_url = "http://127.0.0.1:8000"
proxy_prefixes = ["/api", "/test_api"]

# Upstream timeouts (ms)
connect_timeout_ms = 5000
request_timeout_ms = 30000

# Largest request body forwarded upstream (bytes)
max_body_size = 10485760

# Health endpoints (live/ready/summary), off unless a mount point is set.
# Paths under it are no longer served by the frontend.
# health_path = "/_edge/health"

[client]
# Base URL the tee-time endpoints are resolved against
base_url = "http://127.0.0.1:5000"

# Request timeout (ms)
request_timeout_ms = 30000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
