//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TIENDA_DATA_DIR` - Directory for the file-backed store (default: .tienda)
//! - `TIENDA_CATALOG_DELAY_MS` - Simulated catalog latency (default: 350)
//! - `TIENDA_CATALOG_TIMEOUT_MS` - Timeout per catalog fetch attempt (default: 5000)
//! - `TIENDA_CATALOG_ATTEMPTS` - Fetch attempts before falling back to an empty catalog (default: 3)
//! - `TIENDA_PAYMENT_DELAY_MS` - Simulated payment latency (default: 800)
//! - `TIENDA_PAYMENT_TIMEOUT_MS` - Payment approval timeout (default: 10000)
//! - `TIENDA_PAYMENT_DECLINE` - Make the payment simulator decline (default: false)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding one JSON file per storage key
    pub data_dir: PathBuf,
    /// Catalog source settings
    pub catalog: CatalogConfig,
    /// Payment simulator settings
    pub payment: PaymentConfig,
}

/// Catalog fetch configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Simulated network latency
    pub delay: Duration,
    /// Timeout for a single fetch attempt
    pub timeout: Duration,
    /// Number of attempts before giving up (at least 1)
    pub attempts: u32,
}

/// Payment simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentConfig {
    /// Simulated processing latency
    pub delay: Duration,
    /// How long checkout waits for an answer
    pub timeout: Duration,
    /// Whether every payment is declined
    pub decline: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tienda"),
            catalog: CatalogConfig {
                delay: Duration::from_millis(350),
                timeout: Duration::from_secs(5),
                attempts: 3,
            },
            payment: PaymentConfig {
                delay: Duration::from_millis(800),
                timeout: Duration::from_secs(10),
                decline: false,
            },
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
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("TIENDA_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let catalog = CatalogConfig {
            delay: get_millis(&lookup, "TIENDA_CATALOG_DELAY_MS", defaults.catalog.delay)?,
            timeout: get_millis(&lookup, "TIENDA_CATALOG_TIMEOUT_MS", defaults.catalog.timeout)?,
            attempts: get_parsed(&lookup, "TIENDA_CATALOG_ATTEMPTS", defaults.catalog.attempts)?,
        };
        if catalog.attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TIENDA_CATALOG_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let payment = PaymentConfig {
            delay: get_millis(&lookup, "TIENDA_PAYMENT_DELAY_MS", defaults.payment.delay)?,
            timeout: get_millis(&lookup, "TIENDA_PAYMENT_TIMEOUT_MS", defaults.payment.timeout)?,
            decline: get_parsed(&lookup, "TIENDA_PAYMENT_DECLINE", defaults.payment.decline)?,
        };

        Ok(Self {
            data_dir,
            catalog,
            payment,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn get_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a millisecond duration if set, otherwise use `default`.
fn get_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    get_parsed(lookup, key, default_ms).map(Duration::from_millis)
}
