//! Canonical product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CompositeProductId;
use super::status::ProductStatus;

/// A sellable product variant in canonical form.
///
/// Produced by an adapter's normalization layer from platform data. Each
/// platform variant becomes one canonical product keyed by a composite id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Composite `"{productId}-{variantId}"` identifier.
    pub id: CompositeProductId,
    /// Stock keeping unit.
    pub sku: String,
    /// Display title (product title plus variant title when meaningful).
    pub title: String,
    /// Description (HTML as delivered by the platform).
    pub description: String,
    /// Current selling price.
    pub price: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Units available to sell.
    pub stock: i64,
    /// Lifecycle status.
    pub status: ProductStatus,
    /// Image URLs, variant image first.
    pub image_urls: Vec<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Platform-specific passthrough fields.
    pub platform: PlatformFields,
}

/// Platform-specific fields carried alongside a canonical product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformFields {
    /// Vendor or brand.
    pub vendor: Option<String>,
    /// Platform product type.
    pub product_type: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Weight value.
    pub weight: Option<f64>,
    /// Weight unit (e.g. `kg`, `lb`).
    pub weight_unit: Option<String>,
    /// Barcode (UPC, EAN, ...).
    pub barcode: Option<String>,
    /// Compare-at (original) price when on sale.
    pub compare_at_price: Option<Decimal>,
    /// Platform inventory item id backing stock writes.
    pub inventory_item_id: Option<String>,
}

/// Filters for product listings.
///
/// Platforms differ in which filters they honor; unsupported filters are
/// ignored by the adapter and logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilters {
    /// Only products with this status.
    pub status: Option<ProductStatus>,
    /// Only products from this vendor.
    pub vendor: Option<String>,
    /// Only products of this type.
    pub product_type: Option<String>,
    /// Only products updated at or after this instant.
    pub updated_since: Option<DateTime<Utc>>,
}

impl ProductFilters {
    /// Whether no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.vendor.is_none()
            && self.product_type.is_none()
            && self.updated_since.is_none()
    }
}
