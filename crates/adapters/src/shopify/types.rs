//! Shopify REST Admin API wire types.
//!
//! These mirror the JSON Shopify returns. Prices arrive as decimal strings
//! and timestamps as RFC 3339 with a shop-local offset. Fields Shopify may
//! omit or null are `Option` or `#[serde(default)]` so a sparse payload
//! still deserializes.

use chrono::{DateTime, Utc};
use marketsync_core::TrackingInfo;
use serde::{Deserialize, Serialize};

// =============================================================================
// Products
// =============================================================================

/// A product with its variants and images.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    /// `active`, `archived` or `draft`.
    #[serde(default)]
    pub status: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
    #[serde(default)]
    pub images: Vec<ShopifyImage>,
}

/// A product variant (the sellable unit).
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyVariant {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub inventory_item_id: Option<u64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub image_id: Option<u64>,
}

/// A product image.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyImage {
    pub id: u64,
    pub src: String,
    #[serde(default)]
    pub variant_ids: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    pub product: ShopifyProduct,
}

#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct VariantEnvelope {
    pub variant: ShopifyVariant,
}

/// Body of `PUT variants/{id}.json` for a price change.
///
/// `compare_at_price` is omitted rather than nulled when unset, since a null
/// clears the existing value.
#[derive(Debug, Serialize)]
pub struct VariantPriceUpdate {
    pub id: u64,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stock location.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyLocation {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct LocationsEnvelope {
    pub locations: Vec<ShopifyLocation>,
}

/// Body of `POST inventory_levels/set.json`.
#[derive(Debug, Serialize)]
pub struct InventoryLevelSet {
    pub location_id: u64,
    pub inventory_item_id: u64,
    pub available: i64,
}

// =============================================================================
// Orders
// =============================================================================

/// An order.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrder {
    pub id: u64,
    #[serde(default)]
    pub order_number: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub subtotal_price: Option<String>,
    #[serde(default)]
    pub total_tax: Option<String>,
    #[serde(default)]
    pub total_discounts: Option<String>,
    #[serde(default)]
    pub total_shipping_price_set: Option<MoneySet>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default)]
    pub note: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub customer: Option<ShopifyCustomer>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
    #[serde(default)]
    pub shipping_address: Option<ShopifyAddress>,
    #[serde(default)]
    pub billing_address: Option<ShopifyAddress>,
}

/// Amount in shop and presentment currency.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneySet {
    pub shop_money: MoneyAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoneyAmount {
    pub amount: String,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingLine {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomer {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub variant_id: Option<u64>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub variant_title: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderEnvelope {
    pub order: ShopifyOrder,
}

#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<ShopifyOrder>,
}

/// A fulfillment order (the unit Shopify fulfills against).
#[derive(Debug, Clone, Deserialize)]
pub struct FulfillmentOrder {
    pub id: u64,
    /// `open`, `in_progress`, `closed`, `cancelled`, ...
    #[serde(default)]
    pub status: Option<String>,
}

impl FulfillmentOrder {
    /// Whether a fulfillment can still be created against this order.
    #[must_use]
    pub fn is_fulfillable(&self) -> bool {
        matches!(self.status.as_deref(), Some("open" | "in_progress"))
    }
}

#[derive(Debug, Deserialize)]
pub struct FulfillmentOrdersEnvelope {
    pub fulfillment_orders: Vec<FulfillmentOrder>,
}

/// Body of `POST fulfillments.json`.
#[derive(Debug, Serialize)]
pub struct FulfillmentCreate<'a> {
    pub line_items_by_fulfillment_order: Vec<FulfillmentOrderRef>,
    pub notify_customer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_info: Option<&'a TrackingInfo>,
}

#[derive(Debug, Serialize)]
pub struct FulfillmentOrderRef {
    pub fulfillment_order_id: u64,
}

// =============================================================================
// Shop, collections, counts
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyShop {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub myshopify_domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShopEnvelope {
    pub shop: ShopifyShop,
}

/// A manually curated collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomCollection {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomCollectionsEnvelope {
    pub custom_collections: Vec<CustomCollection>,
}

#[derive(Debug, Deserialize)]
pub struct CustomCollectionEnvelope {
    pub custom_collection: CustomCollection,
}

/// Membership of a product in a custom collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Collect {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct CollectsEnvelope {
    pub collects: Vec<Collect>,
}

#[derive(Debug, Deserialize)]
pub struct CountEnvelope {
    pub count: u64,
}

/// Split a Shopify comma-separated tag string.
#[must_use]
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}
