//! Shopify REST Admin API client.
//!
//! This module provides the [`ShopifyAdapter`], which implements the
//! [`MarketplaceAdapter`] contract over the REST Admin API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marketsync_core::{
    BatchReport, CanonicalOrder, CanonicalProduct, Category, CategoryAttribute,
    CollectionManagement, ConnectionStatus, Credentials, MarketplaceAdapter, MarketplaceError,
    OperationResult, OrderStatus, Page, PageRequest, PriceUpdate, ProductFilters, StatusUpdate,
    StockUpdate, TrackingInfo,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::batch::BatchOrchestrator;
use crate::config::AdapterConfig;
use crate::lifecycle::SessionSlot;
use crate::rate_limit::RateLimiter;
use crate::retry::{Backoff, is_retryable_status, is_unprocessed_status};

use super::ShopifyError;
use super::types::ShopEnvelope;

mod collections;
mod conversions;
mod headers;
mod inventory;
mod orders;
mod products;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Largest page Shopify REST returns.
const MAX_PAGE_SIZE: u32 = 250;

/// Currency assumed when the shop does not report one.
const DEFAULT_CURRENCY: &str = "USD";

/// Query string pairs.
type Query = Vec<(&'static str, String)>;

/// Shopify REST Admin API adapter.
///
/// Cheap to clone; clones share the rate limiter and session.
///
/// # Security
///
/// The access token is held in the session as a [`SecretString`] and is
/// dropped by [`close`](MarketplaceAdapter::close).
#[derive(Clone)]
pub struct ShopifyAdapter {
    inner: Arc<ShopifyAdapterInner>,
}

struct ShopifyAdapterInner {
    config: AdapterConfig,
    limiter: Arc<RateLimiter>,
    batch: BatchOrchestrator,
    session: SessionSlot<ShopifySession>,
}

/// State built by `initialize` and dropped by `close`.
struct ShopifySession {
    http: reqwest::Client,
    base_url: Url,
    store: String,
    access_token: SecretString,
    shop_name: Option<String>,
    currency: String,
    /// Cached default stock location (only with `cache_default_location`).
    default_location: Mutex<Option<u64>>,
}

impl std::fmt::Debug for ShopifyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdapter")
            .field("config", &self.inner.config)
            .field("limiter", &self.inner.limiter.config())
            .finish_non_exhaustive()
    }
}

/// Body of a successful response plus the next-page cursor, if any.
struct RestResponse {
    body: String,
    next_cursor: Option<String>,
}

impl ShopifyAdapter {
    /// Create an adapter with its own rate limiter.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` if the config is invalid.
    pub fn new(config: AdapterConfig) -> Result<Self, MarketplaceError> {
        let limiter = RateLimiter::new(config.rate_limit)?;
        Self::with_rate_limiter(config, Arc::new(limiter))
    }

    /// Create an adapter that acquires from the given limiter.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Configuration` if the config is invalid.
    pub fn with_rate_limiter(
        config: AdapterConfig,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, MarketplaceError> {
        config
            .validate()
            .map_err(|e| MarketplaceError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ShopifyAdapterInner {
                batch: BatchOrchestrator::new(config.batch_concurrency),
                config,
                limiter,
                session: SessionSlot::new(),
            }),
        })
    }

    /// Adapter configuration.
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.inner.config
    }

    /// The limiter every request acquires from.
    #[must_use]
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.inner.limiter
    }

    /// Whether `initialize` has succeeded and `close` has not been called.
    pub async fn is_initialized(&self) -> bool {
        self.inner.session.is_initialized().await
    }

    async fn session(&self) -> Result<Arc<ShopifySession>, ShopifyError> {
        Ok(self.inner.session.get().await?)
    }

    /// `https://{store}/admin/api/{version}/`, or the configured override.
    fn base_url(&self, credentials: &Credentials) -> Result<Url, ShopifyError> {
        let mut url = match &self.inner.config.endpoint_override {
            Some(url) => url.clone(),
            None => {
                let version = credentials
                    .api_version()
                    .unwrap_or(&self.inner.config.api_version);
                let store = credentials
                    .store()
                    .trim()
                    .trim_start_matches("https://")
                    .trim_end_matches('/');
                Url::parse(&format!("https://{store}/admin/api/{version}/"))?
            }
        };

        // Url::join replaces the last segment unless the path ends with '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Send a request, acquiring one limiter token per attempt and retrying
    /// throttled and transient failures.
    ///
    /// Writes that are not idempotent are retried only on connect errors, 408
    /// and 429. A timeout or a 5xx may follow a write that was already applied.
    async fn send(
        &self,
        session: &ShopifySession,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<RestResponse, ShopifyError> {
        let url = session.base_url.join(path)?;
        let mut backoff = Backoff::new(self.inner.config.retry);
        let replayable = is_replayable(&method, path);

        loop {
            self.inner.limiter.acquire(1).await?;

            let mut request = session
                .http
                .request(method.clone(), url.clone())
                .header(ACCESS_TOKEN_HEADER, session.access_token.expose_secret());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if is_transient(&e) && (replayable || e.is_connect()) => {
                    if let Some(delay) = backoff.next_delay(None) {
                        warn!(%method, path, error = %e, delay_ms = millis(delay), "Transport error, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };

            if let Some((used, limit)) = headers::call_limit(response.headers()) {
                self.inner.limiter.record_platform_usage(used, limit).await;
            }

            let status = response.status();
            if status.is_success() {
                let next_cursor = headers::next_page_cursor(response.headers());
                let body = response.text().await?;
                return Ok(RestResponse { body, next_cursor });
            }

            let retry_after = headers::retry_after(response.headers());
            let retryable = if replayable {
                is_retryable_status(status.as_u16())
            } else {
                is_unprocessed_status(status.as_u16())
            };
            if retryable
                && let Some(delay) = backoff.next_delay(retry_after)
            {
                warn!(
                    %method,
                    path,
                    status = status.as_u16(),
                    attempt = backoff.retries(),
                    delay_ms = millis(delay),
                    "Shopify request throttled or failed, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyError::from_status(
                status.as_u16(),
                body,
                retry_after.map(headers::retry_after_secs),
            ));
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &ShopifySession,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ShopifyError> {
        Ok(self.get_page(session, path, query).await?.0)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        session: &ShopifySession,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<(T, Option<String>), ShopifyError> {
        let response = self.send(session, Method::GET, path, query, None).await?;
        Ok((serde_json::from_str(&response.body)?, response.next_cursor))
    }

    async fn write(
        &self,
        session: &ShopifySession,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(), ShopifyError> {
        self.send(session, method, path, &[], Some(body)).await?;
        Ok(())
    }

    /// Fetch one page of a listing.
    ///
    /// A cursor is sent alone with `limit` (Shopify rejects filters alongside
    /// `page_info`). Without a cursor, page N walks forward N-1 pages.
    /// Returns `None` when the requested page lies past the end.
    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        session: &ShopifySession,
        path: &str,
        request: &PageRequest,
        page_size: u32,
        filters: Query,
    ) -> Result<Option<(T, Option<String>)>, ShopifyError> {
        if let Some(cursor) = &request.cursor {
            return Ok(Some(
                self.get_page(session, path, &cursor_query(page_size, cursor))
                    .await?,
            ));
        }

        let mut query = filters;
        query.push(("limit", page_size.to_string()));

        let mut remaining = request.page() - 1;
        loop {
            let (body, next) = self.get_page::<T>(session, path, &query).await?;
            if remaining == 0 {
                return Ok(Some((body, next)));
            }
            let Some(cursor) = next else {
                return Ok(None);
            };
            query = cursor_query(page_size, &cursor);
            remaining -= 1;
        }
    }
}

fn cursor_query(page_size: u32, cursor: &str) -> Query {
    vec![
        ("limit", page_size.to_string()),
        ("page_info", cursor.to_string()),
    ]
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// Whether sending the same request twice leaves the store as sending it once.
/// `inventory_levels/set` writes an absolute quantity.
fn is_replayable(method: &Method, path: &str) -> bool {
    if *method == Method::POST {
        return path == "inventory_levels/set.json";
    }
    [Method::GET, Method::HEAD, Method::PUT].contains(method)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Shopify REST ids are numeric; reject anything else before building a path.
fn numeric_id(kind: &str, raw: &str) -> Result<u64, ShopifyError> {
    raw.trim().parse().map_err(|_| {
        ShopifyError::Validation(format!("{kind} id must be numeric, got {raw:?}"))
    })
}

#[async_trait]
impl MarketplaceAdapter for ShopifyAdapter {
    fn platform(&self) -> &'static str {
        "shopify"
    }

    #[instrument(skip(self, credentials), fields(store = %credentials.store()))]
    async fn initialize(&self, credentials: Credentials) -> OperationResult<()> {
        credentials.validate()?;

        let base_url = self
            .base_url(&credentials)
            .map_err(|e| MarketplaceError::Initialization(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(self.inner.config.request_timeout)
            .build()
            .map_err(|e| MarketplaceError::Initialization(format!("HTTP client: {e}")))?;

        let mut session = ShopifySession {
            http,
            base_url,
            store: credentials.store().to_string(),
            access_token: credentials.access_token().clone(),
            shop_name: None,
            currency: DEFAULT_CURRENCY.to_string(),
            default_location: Mutex::new(None),
        };

        let shop = self
            .get_json::<ShopEnvelope>(&session, "shop.json", &[])
            .await
            .map_err(|e| {
                MarketplaceError::Initialization(format!(
                    "connectivity probe failed: {}",
                    MarketplaceError::from(e)
                ))
            })?
            .shop;

        session.shop_name = shop.name;
        if let Some(currency) = shop.currency.filter(|c| !c.is_empty()) {
            session.currency = currency;
        }

        info!(
            currency = %session.currency,
            base_url = %session.base_url,
            "Shopify adapter initialized"
        );
        if self.inner.session.install(session).await.is_some() {
            debug!("Replaced existing Shopify session");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn test_connection(&self) -> ConnectionStatus {
        let Ok(session) = self.session().await else {
            return ConnectionStatus::disconnected(MarketplaceError::NotInitialized.to_string());
        };

        match self
            .get_json::<ShopEnvelope>(&session, "shop.json", &[])
            .await
        {
            Ok(envelope) => ConnectionStatus::connected(format!(
                "Connected to {}",
                envelope
                    .shop
                    .name
                    .or(envelope.shop.myshopify_domain)
                    .or_else(|| session.shop_name.clone())
                    .unwrap_or_else(|| session.store.clone())
            )),
            Err(e) => {
                let err = MarketplaceError::from(e);
                warn!(error = %err, "Shopify connection test failed");
                ConnectionStatus::disconnected(err.to_string())
            }
        }
    }

    async fn get_product_by_sku(&self, sku: &str) -> OperationResult<CanonicalProduct> {
        Ok(self.product_by_sku(sku).await?)
    }

    async fn get_product_by_id(&self, id: &str) -> OperationResult<CanonicalProduct> {
        Ok(self.product_by_id(id).await?)
    }

    async fn get_products_by_skus(&self, skus: &[String]) -> OperationResult<Vec<CanonicalProduct>> {
        Ok(self.products_by_skus(skus).await?)
    }

    async fn get_products(
        &self,
        request: PageRequest,
        filters: ProductFilters,
    ) -> OperationResult<Page<CanonicalProduct>> {
        Ok(self.list_products(&request, &filters).await?)
    }

    async fn update_stock(&self, items: &[StockUpdate]) -> BatchReport {
        self.write_stock(items).await
    }

    async fn update_prices(&self, items: &[PriceUpdate]) -> BatchReport {
        self.write_prices(items).await
    }

    async fn update_status(&self, items: &[StatusUpdate]) -> BatchReport {
        self.write_statuses(items).await
    }

    async fn get_recent_orders(
        &self,
        since: DateTime<Utc>,
        request: PageRequest,
    ) -> OperationResult<Page<CanonicalOrder>> {
        Ok(self.list_orders(since, &request).await?)
    }

    async fn get_order_by_id(&self, id: &str) -> OperationResult<CanonicalOrder> {
        Ok(self.order_by_id(id).await?)
    }

    async fn acknowledge_order(&self, id: &str) -> OperationResult<()> {
        Ok(self.acknowledge(id).await?)
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        tracking: Option<TrackingInfo>,
    ) -> OperationResult<()> {
        Ok(self.transition_order(id, status, tracking.as_ref()).await?)
    }

    async fn get_categories(&self, parent_id: Option<&str>) -> OperationResult<Vec<Category>> {
        Ok(self.categories(parent_id).await?)
    }

    async fn get_category_attributes(
        &self,
        category_id: &str,
    ) -> OperationResult<Vec<CategoryAttribute>> {
        Ok(self.category_attributes(category_id).await?)
    }

    async fn close(&self) {
        if self.inner.session.take().await.is_some() {
            info!("Shopify adapter closed");
        }
    }

    fn collections(&self) -> Option<&dyn CollectionManagement> {
        Some(self)
    }
}
