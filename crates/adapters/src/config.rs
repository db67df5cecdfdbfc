//! Adapter configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (credentials)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional (credentials)
//! - `SHOPIFY_API_KEY` / `SHOPIFY_API_SECRET` - App key pair (must be set together)
//!
//! ## Optional (tuning)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-10)
//! - `MARKETSYNC_RATE_LIMIT_PER_SECOND` - Bucket refill rate (default: 2)
//! - `MARKETSYNC_RATE_LIMIT_BURST` - Bucket size (default: 40)
//! - `MARKETSYNC_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MARKETSYNC_MAX_RETRIES` - Retries after the first attempt (default: 3)
//! - `MARKETSYNC_RETRY_INITIAL_DELAY_MS` - First retry delay (default: 500)
//! - `MARKETSYNC_RETRY_MAX_DELAY_MS` - Retry delay cap (default: 30000)
//! - `MARKETSYNC_BATCH_CONCURRENCY` - Items written concurrently (default: 4)
//! - `MARKETSYNC_SKU_SCAN_PAGES` - Product pages scanned per SKU lookup (default: 1)
//! - `MARKETSYNC_CACHE_DEFAULT_LOCATION` - Cache the stock location per session (default: false)
//! - `MARKETSYNC_ENDPOINT_OVERRIDE` - Replace `https://{store}/admin/api/{version}`

use std::str::FromStr;
use std::time::Duration;

use marketsync_core::Credentials;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::batch::DEFAULT_BATCH_CONCURRENCY;
use crate::rate_limit::RateLimitConfig;
use crate::retry::RetryPolicy;

/// Default Shopify Admin API version.
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Adapter tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    /// Leaky-bucket settings.
    pub rate_limit: RateLimitConfig,
    /// Retry settings.
    pub retry: RetryPolicy,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
    /// Default API version (credentials may pin another).
    pub api_version: String,
    /// Items written concurrently by batch operations.
    pub batch_concurrency: usize,
    /// Product pages scanned when resolving SKUs.
    pub sku_scan_pages: u32,
    /// Cache the default stock location for the session's lifetime.
    pub cache_default_location: bool,
    /// Base URL replacing the platform's default endpoint.
    pub endpoint_override: Option<Url>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
            api_version: DEFAULT_API_VERSION.to_string(),
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            sku_scan_pages: 1,
            cache_default_location: false,
            endpoint_override: None,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse or the resulting
    /// configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let rate_limit = RateLimitConfig {
            bucket_size: parse_env_or("MARKETSYNC_RATE_LIMIT_BURST", defaults.rate_limit.bucket_size)?,
            tokens_per_second: parse_env_or(
                "MARKETSYNC_RATE_LIMIT_PER_SECOND",
                defaults.rate_limit.tokens_per_second,
            )?,
        };

        let retry = RetryPolicy {
            max_retries: parse_env_or("MARKETSYNC_MAX_RETRIES", defaults.retry.max_retries)?,
            initial_delay: Duration::from_millis(parse_env_or(
                "MARKETSYNC_RETRY_INITIAL_DELAY_MS",
                duration_millis(defaults.retry.initial_delay),
            )?),
            max_delay: Duration::from_millis(parse_env_or(
                "MARKETSYNC_RETRY_MAX_DELAY_MS",
                duration_millis(defaults.retry.max_delay),
            )?),
            ..defaults.retry
        };

        let endpoint_override = get_optional_env("MARKETSYNC_ENDPOINT_OVERRIDE")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("MARKETSYNC_ENDPOINT_OVERRIDE".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let config = Self {
            rate_limit,
            retry,
            request_timeout: Duration::from_secs(parse_env_or(
                "MARKETSYNC_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            batch_concurrency: parse_env_or(
                "MARKETSYNC_BATCH_CONCURRENCY",
                defaults.batch_concurrency,
            )?,
            sku_scan_pages: parse_env_or("MARKETSYNC_SKU_SCAN_PAGES", defaults.sku_scan_pages)?,
            cache_default_location: parse_env_or(
                "MARKETSYNC_CACHE_DEFAULT_LOCATION",
                defaults.cache_default_location,
            )?,
            endpoint_override,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.batch_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "batch concurrency must be at least 1".to_string(),
            ));
        }
        if self.sku_scan_pages == 0 {
            return Err(ConfigError::Invalid(
                "SKU scan pages must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request timeout must be positive".to_string(),
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::Invalid("API version must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load Shopify credentials from environment variables.
///
/// # Errors
///
/// Returns `ConfigError` if a required variable is missing or only half of
/// the API key pair is set.
pub fn credentials_from_env() -> Result<Credentials, ConfigError> {
    let _ = dotenvy::dotenv();

    let mut credentials = Credentials::new(
        get_required_env("SHOPIFY_STORE")?,
        get_required_env("SHOPIFY_ACCESS_TOKEN")?,
    );

    match (
        get_optional_env("SHOPIFY_API_KEY"),
        get_optional_env("SHOPIFY_API_SECRET"),
    ) {
        (Some(key), Some(secret)) => {
            credentials = credentials.with_key_pair(key, SecretString::from(secret));
        }
        (None, None) => {}
        _ => {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_API_*".to_string(),
                "Both SHOPIFY_API_KEY and SHOPIFY_API_SECRET must be set together".to_string(),
            ));
        }
    }

    if let Some(version) = get_optional_env("SHOPIFY_API_VERSION") {
        credentials = credentials.with_api_version(version);
    }

    Ok(credentials)
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AdapterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_limit.bucket_size, 40);
        assert!((config.rate_limit.tokens_per_second - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(!config.cache_default_location);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_concurrency = AdapterConfig {
            batch_concurrency: 0,
            ..AdapterConfig::default()
        };
        assert!(zero_concurrency.validate().is_err());

        let zero_pages = AdapterConfig {
            sku_scan_pages: 0,
            ..AdapterConfig::default()
        };
        assert!(zero_pages.validate().is_err());

        let zero_burst = AdapterConfig {
            rate_limit: RateLimitConfig {
                bucket_size: 0,
                tokens_per_second: 2.0,
            },
            ..AdapterConfig::default()
        };
        assert!(zero_burst.validate().is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u32>("X", " 12 ").ok(), Some(12));
        assert_eq!(parse_value::<bool>("X", "true").ok(), Some(true));

        let err = parse_value::<u32>("MARKETSYNC_MAX_RETRIES", "many").expect_err("invalid");
        assert!(err.to_string().starts_with("Invalid environment variable MARKETSYNC_MAX_RETRIES"));
    }
}
