//! Integration test support for Marketsync.
//!
//! Tests run a [`wiremock`] server standing in for a Shopify store and point
//! a [`ShopifyAdapter`] at it through `endpoint_override`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketsync-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let store = MockStore::start().await;
//! let adapter = store.connected_adapter().await;
//!
//! Mock::given(method("GET"))
//!     .and(path(store.api_path("products.json")))
//!     .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::products(&[...])))
//!     .mount(store.server())
//!     .await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fixtures;

use std::time::Duration;

use marketsync_adapters::{AdapterConfig, RateLimitConfig, RetryPolicy, ShopifyAdapter};
use marketsync_core::{Credentials, MarketplaceAdapter};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use wiremock;

/// API version baked into every mocked path.
pub const API_VERSION: &str = "2024-10";

/// Store domain reported by the mock shop.
pub const STORE: &str = "marketsync-test.myshopify.com";

/// Access token the adapter is initialized with.
pub const ACCESS_TOKEN: &str = "shpat_test_token";

/// A mock Shopify store.
pub struct MockStore {
    server: MockServer,
    api_prefix: String,
    credentials: Credentials,
}

impl MockStore {
    /// Start an empty mock store.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            api_prefix: format!("/admin/api/{API_VERSION}"),
            credentials: Credentials::new(STORE, ACCESS_TOKEN),
        }
    }

    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Absolute request path for an Admin API resource.
    #[must_use]
    pub fn api_path(&self, resource: &str) -> String {
        format!("{}/{resource}", self.api_prefix)
    }

    /// Absolute URL for an Admin API resource, as Shopify writes it in `Link`.
    #[must_use]
    pub fn api_url(&self, resource: &str) -> String {
        format!("{}{}", self.server.uri(), self.api_path(resource))
    }

    /// `Link` header pointing at the next page of `resource`.
    #[must_use]
    pub fn next_link(&self, resource: &str, page_info: &str) -> String {
        format!(
            r#"<{}?limit=250&page_info={page_info}>; rel="next""#,
            self.api_url(resource)
        )
    }

    /// Adapter config aimed at this store, with a generous limiter and
    /// millisecond retry delays.
    ///
    /// # Panics
    ///
    /// Panics if the server URI is not a valid URL.
    #[must_use]
    pub fn config(&self) -> AdapterConfig {
        let endpoint = Url::parse(&format!("{}{}/", self.server.uri(), self.api_prefix))
            .expect("mock server URI is a valid URL");
        AdapterConfig {
            rate_limit: RateLimitConfig {
                bucket_size: 100,
                tokens_per_second: 1000.0,
            },
            retry: RetryPolicy {
                max_retries: 2,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(10),
                multiplier: 2.0,
                jitter_factor: 0.0,
            },
            request_timeout: Duration::from_secs(5),
            endpoint_override: Some(endpoint),
            ..AdapterConfig::default()
        }
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }

    /// Mount the `shop.json` probe.
    pub async fn mount_shop(&self) {
        Mock::given(method("GET"))
            .and(path(self.api_path("shop.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::shop()))
            .mount(&self.server)
            .await;
    }

    /// Adapter built from [`config`](Self::config), not yet initialized.
    ///
    /// # Panics
    ///
    /// Panics if the config is rejected.
    #[must_use]
    pub fn adapter(&self) -> ShopifyAdapter {
        self.adapter_with(self.config())
    }

    /// # Panics
    ///
    /// Panics if the config is rejected.
    #[must_use]
    pub fn adapter_with(&self, config: AdapterConfig) -> ShopifyAdapter {
        ShopifyAdapter::new(config).expect("test config is valid")
    }

    /// Mount the shop probe and return an initialized adapter.
    ///
    /// # Panics
    ///
    /// Panics if initialization fails.
    pub async fn connected_adapter(&self) -> ShopifyAdapter {
        self.connected_adapter_with(self.config()).await
    }

    /// # Panics
    ///
    /// Panics if initialization fails.
    pub async fn connected_adapter_with(&self, config: AdapterConfig) -> ShopifyAdapter {
        self.mount_shop().await;
        let adapter = self.adapter_with(config);
        adapter
            .initialize(self.credentials())
            .await
            .expect("adapter initializes against mock store");
        adapter
    }
}
