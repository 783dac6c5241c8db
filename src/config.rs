//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::fetch::EngagementClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: EngagementApiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engagement metrics API (outbound) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.example.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for EngagementApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EngagementApiConfig {
    /// Client configuration for the engagement API
    pub fn client_config(&self) -> EngagementClientConfig {
        EngagementClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Dashboard HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Fetch the default range when the server starts
    #[serde(default = "default_fetch_on_start")]
    pub fetch_on_start: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_fetch_on_start() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            fetch_on_start: default_fetch_on_start(),
        }
    }
}

/// Dashboard defaults
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Days covered by the initial date selection (ending today)
    #[serde(default = "default_range_days")]
    pub default_range_days: i64,
}

fn default_range_days() -> i64 {
    crate::store::DEFAULT_RANGE_DAYS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range_days: default_range_days(),
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

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        format!("weekpulse={},tower_http=debug", self.level)
    }

    /// Build the subscriber described by this config
    ///
    /// `RUST_LOG` wins over the configured level.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        use tracing_subscriber::layer::SubscriberExt;

        let json = self.format.eq_ignore_ascii_case("json");

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| self.default_directive().into()),
            )
            .with(json.then(|| tracing_subscriber::fmt::layer().json()))
            .with((!json).then(tracing_subscriber::fmt::layer))
    }

    /// Install the global tracing subscriber
    pub fn init(&self) {
        use tracing_subscriber::util::SubscriberInitExt;

        self.subscriber().init();
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("weekpulse").join("config.toml")),
            Some(PathBuf::from("/etc/weekpulse/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        Self::load_first(config_paths.into_iter().flatten())
    }

    /// `load_default` for binaries that build their global subscriber from
    /// the loaded config: messages about the search go to a default-level
    /// subscriber in the meantime.
    pub fn load_startup() -> Self {
        tracing::subscriber::with_default(
            LoggingConfig::default().subscriber(),
            Self::load_default,
        )
    }

    /// Load the first existing file that parses, else defaults; env overrides apply either way
    fn load_first(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in paths {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Engagement API overrides
        if let Some(url) = var("WEEKPULSE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("WEEKPULSE_API_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.api.timeout_secs = timeout;
        }

        // Server overrides
        if let Some(host) = var("WEEKPULSE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("WEEKPULSE_PORT").and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }

        // Dashboard overrides
        if let Some(days) = var("WEEKPULSE_DEFAULT_RANGE_DAYS").and_then(|s| s.parse().ok()) {
            self.dashboard.default_range_days = days;
        }

        // Logging overrides
        if let Some(level) = var("WEEKPULSE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("WEEKPULSE_LOG_FORMAT") {
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
    r#"# Weekpulse Configuration
#
# Environment variables override these settings:
# - WEEKPULSE_API_URL
# - WEEKPULSE_API_TIMEOUT_SECS
# - WEEKPULSE_HOST
# - WEEKPULSE_PORT
# - WEEKPULSE_DEFAULT_RANGE_DAYS
# - WEEKPULSE_LOG_LEVEL
# - WEEKPULSE_LOG_FORMAT

[api]
# Base URL of the analytics API serving
# /api/v1/analytics/user_engagement_metrics
base_url = "https://api.example.com"

# Request timeout in seconds
timeout_secs = 30

[server]
# Dashboard API host
host = "0.0.0.0"

# Dashboard API port
port = 8082

# Allowed CORS origins (empty = allow any)
cors_origins = []

# Fetch the default date range when the server starts
fetch_on_start = true

[dashboard]
# Days covered by the initial date selection, ending today
default_range_days = 7

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
