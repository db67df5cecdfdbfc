//! Marketsync Adapters - Rate-limited marketplace platform clients.
//!
//! This crate implements the [`MarketplaceAdapter`](marketsync_core::MarketplaceAdapter)
//! contract for concrete platforms, plus the shared machinery every
//! platform client needs:
//!
//! - [`rate_limit`] - Leaky-bucket limiter every outbound request acquires from
//! - [`retry`] - Exponential backoff for throttled and transient failures
//! - [`batch`] - Bounded-concurrency batch writes with per-item accounting
//! - [`lifecycle`] - Initialize/close session slot
//! - [`config`] - Environment-driven configuration
//! - [`shopify`] - Shopify REST Admin API adapter
//!
//! # Example
//!
//! ```rust,ignore
//! use marketsync_adapters::{AdapterConfig, ShopifyAdapter, credentials_from_env};
//! use marketsync_core::MarketplaceAdapter;
//!
//! let adapter = ShopifyAdapter::new(AdapterConfig::from_env()?)?;
//! adapter.initialize(credentials_from_env()?).await?;
//!
//! let product = adapter.get_product_by_sku("IPOD2008PINK").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod batch;
pub mod config;
pub mod lifecycle;
pub mod rate_limit;
pub mod retry;
pub mod shopify;

pub use batch::{BatchOrchestrator, DEFAULT_BATCH_CONCURRENCY};
pub use config::{AdapterConfig, ConfigError, DEFAULT_API_VERSION, credentials_from_env};
pub use lifecycle::SessionSlot;
pub use rate_limit::{LimiterStats, PlatformUsage, RateLimitConfig, RateLimiter};
pub use retry::{Backoff, RetryPolicy};
pub use shopify::{ShopifyAdapter, ShopifyError};
