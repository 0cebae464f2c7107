//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `IMARKET_CATALOG_URL` - Catalog endpoint (default: <https://dummyjson.com/products>)
//! - `IMARKET_REQUEST_TIMEOUT_SECS` - Catalog request timeout in seconds (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. `production`)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Catalog endpoint used when `IMARKET_CATALOG_URL` is unset.
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products";

const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN (it embeds a key).
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Catalog endpoint configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("catalog", &self.catalog)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

/// Where and how the catalog is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Fully qualified catalog URL (http or https)
    pub endpoint: Url,
    /// Upper bound on a single catalog request
    pub request_timeout: Duration,
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_lookup(&lookup)?;

        Ok(Self {
            catalog,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }
}

impl CatalogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url =
            non_empty(lookup("IMARKET_CATALOG_URL")).unwrap_or_else(|| DEFAULT_CATALOG_URL.into());
        let endpoint = parse_endpoint(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("IMARKET_CATALOG_URL".to_string(), e))?;

        let raw_timeout = non_empty(lookup("IMARKET_REQUEST_TIMEOUT_SECS"))
            .unwrap_or_else(|| DEFAULT_REQUEST_TIMEOUT_SECS.into());
        let secs = raw_timeout.parse::<u64>().map_err(|e| {
            ConfigError::InvalidEnvVar("IMARKET_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "IMARKET_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            request_timeout: Duration::from_secs(secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and check a catalog endpoint URL.
///
/// # Errors
///
/// Returns a description of the problem if the URL does not parse or is not
/// http(s).
pub fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

/// Treat empty values the same as unset ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
