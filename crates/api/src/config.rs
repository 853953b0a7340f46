//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 3000)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `MAX_BODY_SIZE` - Request body limit in bytes (default: 10 MiB)
//! - `MEDIA_ROOT` - Directory uploaded images are written to (default: media)
//! - `MEDIA_URL` - URL prefix the media directory is served under (default: /media)
//! - `THUMBNAIL_MAX_EDGE` - Longest edge of derived thumbnails in pixels (default: 320)
//! - `THUMBNAIL_QUALITY` - JPEG quality of derived thumbnails, 1-100 (default: 70)
//! - `DEFAULT_PAGE_SIZE` - List page size when none is requested (default: 20)
//! - `MAX_PAGE_SIZE` - Upper bound for `page_size` (default: 100)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0-1.0 (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Request body limit in bytes (base64 image payloads count against it)
    pub max_body_size: usize,
    /// Media storage and thumbnail settings
    pub media: MediaConfig,
    /// List pagination settings
    pub pagination: PaginationConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_size", &self.max_body_size)
            .field("media", &self.media)
            .field("pagination", &self.pagination)
            .field("json_logs", &self.json_logs)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// Where uploaded images live and how thumbnails are derived from them.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Filesystem directory for stored files
    pub root: PathBuf,
    /// Public URL prefix for stored files
    pub url: String,
    /// Longest edge of a derived thumbnail, in pixels
    pub thumbnail_max_edge: u32,
    /// JPEG quality of a derived thumbnail (1-100)
    pub thumbnail_quality: u8,
}

/// Page size bounds for list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = SecretString::from(env.required("DATABASE_URL")?);
        let db_max_connections = env.parse_or("DB_MAX_CONNECTIONS", 10)?;
        let host = env.parse_or("API_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("API_PORT", 3000)?;
        let max_body_size = env.parse_or("MAX_BODY_SIZE", 10 * 1024 * 1024)?;

        let thumbnail_quality: u8 = env.parse_or("THUMBNAIL_QUALITY", 70)?;
        if !(1..=100).contains(&thumbnail_quality) {
            return Err(ConfigError::InvalidEnvVar(
                "THUMBNAIL_QUALITY".to_string(),
                "must be between 1 and 100".to_string(),
            ));
        }
        let thumbnail_max_edge: u32 = env.parse_or("THUMBNAIL_MAX_EDGE", 320)?;
        if thumbnail_max_edge == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "THUMBNAIL_MAX_EDGE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let media = MediaConfig {
            root: PathBuf::from(env.or("MEDIA_ROOT", "media")),
            url: env.or("MEDIA_URL", "/media").trim_end_matches('/').to_string(),
            thumbnail_max_edge,
            thumbnail_quality,
        };

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_page_size: env.parse_or("DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: env.parse_or("MAX_PAGE_SIZE", defaults.max_page_size)?,
        };
        if pagination.default_page_size < 1 || pagination.max_page_size < pagination.default_page_size
        {
            return Err(ConfigError::InvalidEnvVar(
                "DEFAULT_PAGE_SIZE".to_string(),
                "must be at least 1 and not exceed MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            media,
            pagination,
            json_logs: env
                .optional("LOG_FORMAT")
                .is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
