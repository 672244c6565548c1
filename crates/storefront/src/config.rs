//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ESHOP_API_BASE_URL` - Base URL of the E-Shop REST API
//!
//! ## Optional
//! - `ESHOP_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `ESHOP_SESSION_FILE` - Path of the persisted session cache
//!   (default: `$ESHOP_HOME/session.json`, falling back to
//!   `$HOME/.eshop/session.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use eshop_client::{ApiClient, ApiError};

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot determine a session file path; set ESHOP_SESSION_FILE")]
    NoSessionPath,
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] ApiError),
}

/// E-Shop client configuration.
#[derive(Debug, Clone)]
pub struct EshopConfig {
    /// Base URL of the remote REST API.
    pub api_base_url: Url,
    /// Bounded timeout applied to every request.
    pub request_timeout: Duration,
    /// Where the session cache is persisted.
    pub session_file: PathBuf,
}

impl EshopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("ESHOP_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ESHOP_API_BASE_URL".to_string(), e.to_string())
            })?;

        let timeout_secs = get_env_or_default(
            "ESHOP_REQUEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ESHOP_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let session_file = match get_optional_env("ESHOP_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file().ok_or(ConfigError::NoSessionPath)?,
        };

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Build an unauthenticated [`ApiClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn api_client(&self) -> Result<ApiClient, ConfigError> {
        Ok(ApiClient::new(&self.api_base_url, self.request_timeout)?)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn default_session_file() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("ESHOP_HOME") {
        return Some(PathBuf::from(home).join("session.json"));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".eshop").join("session.json"))
}
