//! Canonical order types.
//!
//! A [`CanonicalOrder`] is a snapshot of platform state at fetch time. It is
//! never mutated locally and pushed back; targeted operations
//! (acknowledge, status update) push changes instead.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, VariantId};
use super::money::OrderTotals;
use super::status::{OrderStatus, PaymentStatus, ShippingStatus};

/// An order in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrder {
    /// Platform order id.
    pub id: OrderId,
    /// Human-facing order number.
    pub number: String,
    /// Display name (e.g. `#1001`).
    pub name: Option<String>,
    /// Customer contact snapshot.
    pub customer: CustomerSnapshot,
    /// Line items.
    pub line_items: Vec<OrderLineItem>,
    /// Computed financial totals.
    pub totals: OrderTotals,
    /// Overall order status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Shipping status.
    pub shipping_status: ShippingStatus,
    /// Shipping address.
    pub shipping_address: Option<Address>,
    /// Billing address.
    pub billing_address: Option<Address>,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-text note.
    pub note: Option<String>,
    /// Order tags.
    pub tags: Vec<String>,
}

/// Customer contact details captured on an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    /// Platform customer id.
    pub id: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

impl CustomerSnapshot {
    /// Full name, if any part is known.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }
}

/// A single line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Referenced platform product.
    pub product_id: Option<ProductId>,
    /// Referenced platform variant.
    pub variant_id: Option<VariantId>,
    /// SKU at time of purchase.
    pub sku: Option<String>,
    /// Line title.
    pub title: String,
    /// Units ordered.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub line_total: Decimal,
}

/// Mailing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient name.
    pub name: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// First line of the address.
    pub address1: Option<String>,
    /// Second line of the address.
    pub address2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Province or state name.
    pub province: Option<String>,
    /// Province or state code.
    pub province_code: Option<String>,
    /// Postal/ZIP code.
    pub zip: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    pub country_code: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// Carrier tracking details attached when an order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    /// Tracking number.
    pub number: Option<String>,
    /// Carrier name.
    pub company: Option<String>,
    /// Tracking URL.
    pub url: Option<String>,
}
