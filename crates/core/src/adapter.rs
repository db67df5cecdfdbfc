//! The platform-agnostic adapter contract.
//!
//! Every marketplace integration implements [`MarketplaceAdapter`]. The
//! contract only carries operations that make sense on every platform;
//! platform-specific capabilities are exposed through optional capability
//! traits (e.g. [`CollectionManagement`]) that callers check for explicitly:
//!
//! ```rust,ignore
//! if let Some(collections) = adapter.collections() {
//!     collections.add_product_to_collection("841564295", &product.id).await?;
//! }
//! ```
//!
//! # Lifecycle
//!
//! Adapters are constructed with their configuration and rate limiter, then
//! `initialize`d with [`Credentials`]. Any call before `initialize` succeeds
//! returns [`MarketplaceError::NotInitialized`](crate::MarketplaceError).
//! `close` releases the HTTP client and credentials and is idempotent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OperationResult;
use crate::report::BatchReport;
use crate::types::{
    CanonicalOrder, CanonicalProduct, Category, CategoryAttribute, CompositeProductId,
    Credentials, OrderStatus, Page, PageRequest, PriceUpdate, ProductFilters, StatusUpdate,
    StockUpdate, TrackingInfo,
};

/// Result of a connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the platform answered with valid credentials.
    pub connected: bool,
    /// Human-readable description.
    pub message: String,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl ConnectionStatus {
    /// A successful check.
    #[must_use]
    pub fn connected(message: impl Into<String>) -> Self {
        Self {
            connected: true,
            message: message.into(),
            checked_at: Utc::now(),
        }
    }

    /// A failed check.
    #[must_use]
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: message.into(),
            checked_at: Utc::now(),
        }
    }
}

/// Operations every marketplace integration exposes.
#[async_trait]
pub trait MarketplaceAdapter: Send + Sync {
    /// Short platform name (e.g. `shopify`).
    fn platform(&self) -> &'static str;

    /// Validate credentials, build the HTTP client and probe connectivity.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Initialization` if required credentials are
    /// missing or the connectivity probe fails.
    async fn initialize(&self, credentials: Credentials) -> OperationResult<()>;

    /// Check connectivity. Never fails; problems are reported in the status.
    async fn test_connection(&self) -> ConnectionStatus;

    /// Look up a product variant by SKU.
    async fn get_product_by_sku(&self, sku: &str) -> OperationResult<CanonicalProduct>;

    /// Look up a product by canonical id (or bare platform product id).
    async fn get_product_by_id(&self, id: &str) -> OperationResult<CanonicalProduct>;

    /// Look up several SKUs in one pass. Missing SKUs are logged, not errors.
    async fn get_products_by_skus(&self, skus: &[String])
    -> OperationResult<Vec<CanonicalProduct>>;

    /// List products with canonical pagination metadata.
    async fn get_products(
        &self,
        page: PageRequest,
        filters: ProductFilters,
    ) -> OperationResult<Page<CanonicalProduct>>;

    /// Set stock levels. Every item is accounted for in the report.
    async fn update_stock(&self, items: &[StockUpdate]) -> BatchReport;

    /// Set prices. Every item is accounted for in the report.
    async fn update_prices(&self, items: &[PriceUpdate]) -> BatchReport;

    /// Set product lifecycle status. Every item is accounted for in the report.
    async fn update_status(&self, items: &[StatusUpdate]) -> BatchReport;

    /// Orders created at or after `since`.
    async fn get_recent_orders(
        &self,
        since: DateTime<Utc>,
        page: PageRequest,
    ) -> OperationResult<Page<CanonicalOrder>>;

    /// Look up an order by platform id.
    async fn get_order_by_id(&self, id: &str) -> OperationResult<CanonicalOrder>;

    /// Mark an order as received by the internal system. Idempotent.
    async fn acknowledge_order(&self, id: &str) -> OperationResult<()>;

    /// Move an order to a new status, optionally with tracking details.
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        tracking: Option<TrackingInfo>,
    ) -> OperationResult<()>;

    /// Categories under `parent_id` (top-level when `None`).
    async fn get_categories(&self, parent_id: Option<&str>) -> OperationResult<Vec<Category>>;

    /// Attributes products in a category may carry.
    async fn get_category_attributes(
        &self,
        category_id: &str,
    ) -> OperationResult<Vec<CategoryAttribute>>;

    /// Release the HTTP client and credentials. Idempotent.
    async fn close(&self);

    /// Collection management, if the platform supports it.
    fn collections(&self) -> Option<&dyn CollectionManagement> {
        None
    }
}

/// Optional capability: manual product collections.
#[async_trait]
pub trait CollectionManagement: Send + Sync {
    /// Add a product to a collection.
    async fn add_product_to_collection(
        &self,
        collection_id: &str,
        product_id: &CompositeProductId,
    ) -> OperationResult<()>;

    /// Remove a product from a collection.
    async fn remove_product_from_collection(
        &self,
        collection_id: &str,
        product_id: &CompositeProductId,
    ) -> OperationResult<()>;
}
