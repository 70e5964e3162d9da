//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_SESSION_DATABASE_URL` - `SQLite` URL for the session store
//!   (default: `sqlite://attar-sessions.db?mode=rwc`)
//! - `STOREFRONT_CATALOG_PATH` - Catalog JSON replacing the built-in catalog
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `STOREFRONT_CAROUSEL_AUTOPLAY_MS` - Carousel auto-advance interval (default: 5000)
//! - `STOREFRONT_TOAST_MS` - Add-to-cart notice lifetime (default: 1500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default carousel auto-advance interval.
pub const DEFAULT_CAROUSEL_AUTOPLAY_MS: u64 = 5000;

/// Default lifetime of the add-to-cart confirmation.
pub const DEFAULT_TOAST_MS: u64 = 1500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `SQLite` URL for tower-sessions storage
    pub session_database_url: String,
    /// Optional catalog file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// UI timing
    pub ui: UiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Timer settings rendered into the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiConfig {
    /// Carousel auto-advance interval
    pub carousel_autoplay: Duration,
    /// How long the add-to-cart notice stays visible
    pub toast_lifetime: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            carousel_autoplay: Duration::from_millis(DEFAULT_CAROUSEL_AUTOPLAY_MS),
            toast_lifetime: Duration::from_millis(DEFAULT_TOAST_MS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let session_database_url = get_env_or_default(
            "STOREFRONT_SESSION_DATABASE_URL",
            "sqlite://attar-sessions.db?mode=rwc",
        );
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let ui = UiConfig {
            carousel_autoplay: get_positive_millis(
                "STOREFRONT_CAROUSEL_AUTOPLAY_MS",
                DEFAULT_CAROUSEL_AUTOPLAY_MS,
            )?,
            toast_lifetime: get_positive_millis("STOREFRONT_TOAST_MS", DEFAULT_TOAST_MS)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            session_database_url,
            catalog_path,
            static_dir,
            ui,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_database_url: "sqlite::memory:".to_string(),
            catalog_path: None,
            static_dir: PathBuf::from("crates/storefront/static"),
            ui: UiConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to a default literal.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a millisecond interval that must be greater than zero.
fn get_positive_millis(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let raw = get_env_or_default(key, &default.to_string());
    positive_millis(key, &raw)
}

fn positive_millis(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = parse_value(key, raw)?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 8080,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_is_secure_follows_base_url() {
        let mut config = StorefrontConfig::default();
        assert!(!config.is_secure());
        config.base_url = "https://attar.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_ui_defaults() {
        let ui = UiConfig::default();
        assert_eq!(ui.carousel_autoplay, Duration::from_millis(5000));
        assert_eq!(ui.toast_lifetime, Duration::from_millis(1500));
    }

    #[test]
    fn test_positive_millis_rejects_zero_and_garbage() {
        assert!(matches!(
            positive_millis("TEST_MS", "0"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            positive_millis("TEST_MS", "soon"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert_eq!(
            positive_millis("TEST_MS", "250").unwrap(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "99999").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }
}
