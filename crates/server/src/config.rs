//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TIENDITAS_HOST` - Bind address (default: 127.0.0.1)
//! - `TIENDITAS_PORT` - Listen port (default: 3000)
//! - `TIENDITAS_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `TIENDITAS_DATA_DIR` - Directory holding the store document (default: ./data)
//! - `GEMINI_API_KEY` - Google Generative Language API key; without it the
//!   chat assistant and palette derivation degrade to their fallback paths
//! - `GEMINI_MODEL` - Model ID (default: gemini-2.5-flash)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (admin shows it next to each store; cookies go
    /// `Secure` when it is https)
    pub base_url: String,
    /// Directory the store document lives in
    pub data_dir: PathBuf,
    /// Generative AI configuration
    pub genai: GenAiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Google Generative Language API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GenAiConfig {
    /// API key; `None` makes every call fail with a typed error, which the
    /// chat widget and palette assist surface as their user-facing fallbacks.
    pub api_key: Option<SecretString>,
    /// Model ID (e.g. gemini-2.5-flash)
    pub model: String,
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TIENDITAS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIENDITAS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TIENDITAS_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TIENDITAS_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("TIENDITAS_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("TIENDITAS_BASE_URL".to_string(), e.to_string())
        })?;
        let data_dir = PathBuf::from(get_env_or_default("TIENDITAS_DATA_DIR", "./data"));

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            genai: GenAiConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GenAiConfig {
    fn from_env() -> Self {
        Self {
            api_key: get_optional_env("GEMINI_API_KEY").map(SecretString::from),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
