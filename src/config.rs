//! Configuration management for the telemetry service
//!
//! TOML configuration with environment variable overrides and sensible
//! defaults. Everything is read once at startup; nothing is reloadable.
//!
//! Resolution order used by [`load_config`]:
//!
//! 1. Path in the `AQUALOG_CONFIG` environment variable
//! 2. `./aqualog.toml` in the current directory
//! 3. Defaults, with environment overrides applied

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSection,

    /// History retention settings
    #[serde(default)]
    pub retention: RetentionSection,

    /// Security settings
    #[serde(default)]
    pub security: SecuritySection,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    /// Listen address, e.g. `0.0.0.0:8080`
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// History retention settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionSection {
    /// Sliding retention window in days
    #[serde(default = "default_retention_days")]
    pub days: u32,
}

/// Security settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecuritySection {
    /// CORS allowed origins (empty = allow any origin)
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_retention_days() -> u32 {
    1
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RetentionSection {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply environment variable overrides on top of the current values.
    ///
    /// Recognised variables: `AQUALOG_LISTEN_ADDR`, `AQUALOG_LOG_LEVEL`,
    /// `AQUALOG_RETENTION_DAYS`, `AQUALOG_CORS_ORIGINS` (comma-separated).
    pub fn apply_env_overrides(&mut self) -> Result<(), String> {
        if let Ok(addr) = std::env::var("AQUALOG_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Ok(level) = std::env::var("AQUALOG_LOG_LEVEL") {
            self.server.log_level = level;
        }
        if let Ok(days) = std::env::var("AQUALOG_RETENTION_DAYS") {
            self.retention.days = days
                .parse::<u32>()
                .map_err(|e| format!("AQUALOG_RETENTION_DAYS '{days}': {e}"))?;
        }
        if let Ok(origins) = std::env::var("AQUALOG_CORS_ORIGINS") {
            self.security.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Retention window as a duration.
    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.retention.days))
    }
}

/// Load configuration from file or environment.
///
/// Uses `eprintln!` rather than `tracing` because the subscriber is not
/// installed until the configured log level is known.
pub fn load_config() -> AppConfig {
    if let Ok(path) = std::env::var("AQUALOG_CONFIG") {
        match AppConfig::load(&path) {
            Ok(config) => {
                eprintln!("[config] loaded configuration from {path}");
                return config;
            }
            Err(e) => {
                eprintln!("[config] failed to load {path}: {e}; trying defaults");
            }
        }
    }

    let default_path = Path::new("aqualog.toml");
    if default_path.exists() {
        match AppConfig::load(default_path) {
            Ok(config) => {
                eprintln!("[config] loaded configuration from aqualog.toml");
                return config;
            }
            Err(e) => {
                eprintln!("[config] failed to parse aqualog.toml: {e}; using defaults");
            }
        }
    }

    let mut config = AppConfig::default();
    if let Err(e) = config.apply_env_overrides() {
        eprintln!("[config] ignoring invalid environment override: {e}");
    }
    config
}
