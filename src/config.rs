//! Client configuration.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const SERVER_URL_ENV: &str = "STRICTLY_CHESS_URL";

/// Settings for talking to the chess service.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Base URL the `chess/...` endpoints are resolved against.
    #[serde(default = "default_base_url")]
    #[setters(into)]
    base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Log file written by the terminal frontend.
    #[serde(default = "default_log_file")]
    #[setters(into)]
    log_file: String,

    /// Where the service session cookie is kept between runs.
    #[serde(default = "default_session_file")]
    #[setters(into)]
    session_file: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/chess-player/".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_log_file() -> String {
    "strictly_chess.log".to_string()
}

fn default_session_file() -> String {
    "strictly_chess.session".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            log_file: default_log_file(),
            session_file: default_session_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise defaults, then applies the
    /// [`SERVER_URL_ENV`] override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        Ok(config.with_url_override(std::env::var(SERVER_URL_ENV).ok().as_deref()))
    }

    /// Replaces the base URL with `url` unless it is absent or blank.
    #[instrument(skip(self))]
    pub fn with_url_override(self, url: Option<&str>) -> Self {
        match url.map(str::trim) {
            Some(url) if !url.is_empty() => {
                debug!(url, "Server URL overridden");
                self.with_base_url(url)
            }
            _ => self,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parsed base URL, always ending in `/` so relative paths append.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub fn service_url(&self) -> Result<reqwest::Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        reqwest::Url::parse(&raw)
            .map_err(|e| ConfigError::new(format!("Invalid base URL {:?}: {}", self.base_url, e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
