//! Shopify REST Admin API adapter.
//!
//! # Security
//!
//! The adapter holds an Admin API access token with write access to
//! products, inventory and orders. The token lives in a [`secrecy::SecretString`]
//! inside the session and is only exposed when building a request header.
//!
//! # Architecture
//!
//! - REST endpoints under `https://{store}/admin/api/{version}/`
//! - Every attempt (retries included) acquires one token from the adapter's
//!   [`RateLimiter`](crate::RateLimiter)
//! - Wire types in [`types`] are converted to canonical records by the
//!   normalization layer in `rest::conversions`
//! - Platform errors ([`ShopifyError`]) are classified into
//!   [`MarketplaceError`] at the adapter boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use marketsync_adapters::{AdapterConfig, ShopifyAdapter};
//! use marketsync_core::{Credentials, MarketplaceAdapter, StockUpdate};
//!
//! let adapter = ShopifyAdapter::new(AdapterConfig::default())?;
//! adapter
//!     .initialize(Credentials::new("your-store.myshopify.com", token))
//!     .await?;
//!
//! let report = adapter
//!     .update_stock(&[StockUpdate::new("IPOD2008PINK", 12)])
//!     .await;
//! ```

mod rest;
pub mod types;

pub use rest::ShopifyAdapter;

use marketsync_core::MarketplaceError;
use thiserror::Error;

/// Retry-After assumed when a 429 carries no usable header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Errors that can occur when interacting with the Shopify REST Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request rejected as malformed (400/422).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transient server-side failure that outlived the retry budget.
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// Any other unexpected status.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Error raised locally by the adapter (limiter, id parsing).
    #[error(transparent)]
    Local(#[from] MarketplaceError),
}

impl ShopifyError {
    /// Classify a non-success HTTP response.
    #[must_use]
    pub fn from_status(status: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        match status {
            404 => Self::NotFound(if body.is_empty() {
                "resource not found".to_string()
            } else {
                body
            }),
            400 | 422 => Self::Validation(body),
            429 => Self::RateLimited(retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
            401 | 403 => Self::Unauthorized(if body.is_empty() {
                "Invalid or expired access token".to_string()
            } else {
                body
            }),
            408 | 500..=599 => Self::Server { status, body },
            _ => Self::Status { status, body },
        }
    }
}

impl From<ShopifyError> for MarketplaceError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Http(e) if e.is_decode() => Self::UnknownPlatform(e.to_string()),
            ShopifyError::Http(e) => Self::Transport(e.to_string()),
            ShopifyError::Parse(e) => Self::UnknownPlatform(format!("malformed response: {e}")),
            ShopifyError::Url(e) => Self::Configuration(format!("invalid endpoint: {e}")),
            ShopifyError::NotFound(msg) => Self::NotFound(msg),
            ShopifyError::RateLimited(secs) => Self::RateLimit {
                message: format!("Shopify throttled the request, retry after {secs}s"),
                retry_after_secs: Some(secs),
            },
            ShopifyError::Unauthorized(msg) => Self::Authentication(msg),
            ShopifyError::Validation(msg) => Self::Validation(msg),
            ShopifyError::Server { status, body } => {
                Self::Transport(format!("server error {status}: {body}"))
            }
            ShopifyError::Status { status, body } => {
                Self::UnknownPlatform(format!("unexpected status {status}: {body}"))
            }
            ShopifyError::Local(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use marketsync_core::ErrorCode;

    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");
    }

    #[test]
    fn test_status_classification() {
        let cases = [
            (404, ErrorCode::NotFound),
            (400, ErrorCode::Validation),
            (422, ErrorCode::Validation),
            (429, ErrorCode::RateLimit),
            (401, ErrorCode::Authentication),
            (403, ErrorCode::Authentication),
            (500, ErrorCode::Transport),
            (503, ErrorCode::Transport),
            (408, ErrorCode::Transport),
            (418, ErrorCode::UnknownPlatform),
        ];
        for (status, code) in cases {
            let err: MarketplaceError = ShopifyError::from_status(status, String::new(), None).into();
            assert_eq!(err.code(), code, "status {status}");
        }
    }

    #[test]
    fn test_rate_limit_keeps_retry_after() {
        let err: MarketplaceError = ShopifyError::from_status(429, String::new(), Some(7)).into();
        assert!(err.is_retriable());
        assert!(matches!(
            err,
            MarketplaceError::RateLimit {
                retry_after_secs: Some(7),
                ..
            }
        ));

        let defaulted: MarketplaceError = ShopifyError::from_status(429, String::new(), None).into();
        assert!(matches!(
            defaulted,
            MarketplaceError::RateLimit {
                retry_after_secs: Some(DEFAULT_RETRY_AFTER_SECS),
                ..
            }
        ));
    }

    #[test]
    fn test_authentication_is_not_retriable() {
        let err: MarketplaceError = ShopifyError::from_status(401, String::new(), None).into();
        assert!(!err.is_retriable());
        assert_eq!(err.code(), ErrorCode::Authentication);
    }

    #[test]
    fn test_parse_error_is_unknown_platform() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").expect_err("invalid");
        let err: MarketplaceError = ShopifyError::from(parse).into();
        assert_eq!(err.code(), ErrorCode::UnknownPlatform);
    }

    #[test]
    fn test_local_errors_pass_through() {
        let err: MarketplaceError = ShopifyError::Local(MarketplaceError::NotInitialized).into();
        assert_eq!(err, MarketplaceError::NotInitialized);
    }
}
