//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".carsales/session.json";

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Which presentation client this process behaves as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientVariant {
    /// Admin console: layout shell under `/`, landing on `/dashboard`.
    #[default]
    Desktop,
    /// Mobile app: flat routes, landing on `/home`.
    Mobile,
}

impl ClientVariant {
    /// Parse `desktop` / `mobile` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for any other value.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            other => Err(ConfigError::Parse(format!(
                "unknown client variant '{other}' (expected 'desktop' or 'mobile')"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
    pub variant: ClientVariant,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            variant: ClientVariant::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CARSALES_API_BASE_URL`: default `http://127.0.0.1:8080/api`
    /// - `CARSALES_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CARSALES_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CARSALES_SESSION_FILE`: default `.carsales/session.json`
    /// - `CARSALES_CLIENT`: `desktop` (default) or `mobile`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown client variant or an
    /// empty base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("CARSALES_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned()),
        )?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CARSALES_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CARSALES_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let session_file = std::env::var("CARSALES_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);
        let variant = match std::env::var("CARSALES_CLIENT") {
            Ok(raw) => ClientVariant::parse(&raw)?,
            Err(_) => ClientVariant::default(),
        };

        Ok(Self { base_url, timeouts, session_file, variant })
    }
}

/// Trim whitespace and trailing slashes so paths can be appended verbatim.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when nothing is left.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Parse("CARSALES_API_BASE_URL is empty".to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
