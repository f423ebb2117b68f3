//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::locale::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Recharge server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Raw `Cookie` header value of an authenticated browser session
    #[serde(default)]
    pub session_cookie: Option<String>,

    /// Anti-forgery token; scraped from the manage page when unset
    #[serde(default)]
    pub csrf_token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            csrf_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
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

    /// Defaults plus environment variable overrides
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
            dirs::config_dir().map(|p| p.join("recarga").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(url) = std::env::var("RECARGA_BASE_URL") {
            self.server.base_url = url;
        }
        if let Ok(cookie) = std::env::var("RECARGA_SESSION_COOKIE") {
            self.server.session_cookie = Some(cookie);
        }
        if let Ok(token) = std::env::var("RECARGA_CSRF_TOKEN") {
            self.server.csrf_token = Some(token);
        }

        if let Ok(locale) = std::env::var("RECARGA_LOCALE") {
            match locale.parse() {
                Ok(l) => self.display.locale = l,
                Err(e) => tracing::warn!("Ignoring RECARGA_LOCALE: {}", e),
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("RECARGA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RECARGA_LOG_FORMAT") {
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
    r#"# Recarga Configuration
#
# Environment variables override these settings:
# - RECARGA_BASE_URL
# - RECARGA_SESSION_COOKIE
# - RECARGA_CSRF_TOKEN
# - RECARGA_LOCALE
# - RECARGA_LOG_LEVEL
# - RECARGA_LOG_FORMAT

[server]
# Root URL of the recharge web application
base_url = "http://localhost:5000"

# Cookie header of a logged-in session, e.g. "session=..."
# session_cookie = ""

# Anti-forgery token. When unset it is read from the
# csrf-token meta tag of /manage_recharges.
# csrf_token = ""

[display]
# Number formatting and messages: pt-BR or en-US
locale = "pt-BR"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
