//! Normalization layer: Shopify wire types to canonical records.
//!
//! Every mapping is total. Unknown platform values fall back to a documented
//! canonical value and malformed amounts become zero with a warning, so a
//! single odd record never fails a whole listing.

mod categories;
mod orders;
mod products;

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

pub use categories::{convert_collection, product_attribute_schema};
pub use orders::{
    convert_order, order_status_from_shopify, payment_status_from_shopify,
    shipping_status_from_shopify,
};
pub use products::{
    convert_variant, product_status_from_shopify, product_status_to_shopify, variant_title,
};

/// Parse a Shopify decimal string. Missing or malformed values become zero.
pub fn parse_amount(raw: Option<&str>, field: &'static str) -> Decimal {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Decimal::ZERO;
    };
    Decimal::from_str(value).unwrap_or_else(|e| {
        warn!(field, value, error = %e, "Unparseable amount, using zero");
        Decimal::ZERO
    })
}
