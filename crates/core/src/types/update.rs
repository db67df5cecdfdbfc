//! Batch write payloads.
//!
//! Every item is keyed by SKU. When the caller already knows the canonical
//! composite id it can be supplied to skip SKU resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CompositeProductId;
use super::status::ProductStatus;

/// Common view over batch write items.
pub trait ItemRef {
    /// SKU used as the item's identifier in the batch report.
    fn sku(&self) -> &str;

    /// Canonical id, if the caller supplied one.
    fn product_id(&self) -> Option<&CompositeProductId>;
}

/// Set the available quantity of a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    /// SKU to update.
    pub sku: String,
    /// Canonical id (skips SKU lookup when present).
    #[serde(default)]
    pub product_id: Option<CompositeProductId>,
    /// New available quantity.
    pub quantity: i64,
}

impl StockUpdate {
    /// Stock update keyed by SKU alone.
    #[must_use]
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            product_id: None,
            quantity,
        }
    }
}

/// Set the price of a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// SKU to update.
    pub sku: String,
    /// Canonical id (skips SKU lookup when present).
    #[serde(default)]
    pub product_id: Option<CompositeProductId>,
    /// New selling price.
    pub price: Decimal,
    /// New compare-at price, if any.
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
}

impl PriceUpdate {
    /// Price update keyed by SKU alone.
    #[must_use]
    pub fn new(sku: impl Into<String>, price: Decimal) -> Self {
        Self {
            sku: sku.into(),
            product_id: None,
            price,
            compare_at_price: None,
        }
    }
}

/// Set the lifecycle status of the product owning a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// SKU to update.
    pub sku: String,
    /// Canonical id (skips SKU lookup when present).
    #[serde(default)]
    pub product_id: Option<CompositeProductId>,
    /// New status.
    pub status: ProductStatus,
}

impl StatusUpdate {
    /// Status update keyed by SKU alone.
    #[must_use]
    pub fn new(sku: impl Into<String>, status: ProductStatus) -> Self {
        Self {
            sku: sku.into(),
            product_id: None,
            status,
        }
    }
}

macro_rules! impl_item_ref {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ItemRef for $ty {
                fn sku(&self) -> &str {
                    &self.sku
                }

                fn product_id(&self) -> Option<&CompositeProductId> {
                    self.product_id.as_ref()
                }
            }
        )+
    };
}

impl_item_ref!(StockUpdate, PriceUpdate, StatusUpdate);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_product_id() {
        let update: StockUpdate =
            serde_json::from_str(r#"{"sku": "A", "quantity": 5}"#).expect("deserialize");
        assert_eq!(update, StockUpdate::new("A", 5));
        assert!(update.product_id().is_none());
    }

    #[test]
    fn test_deserialize_with_composite_id() {
        let update: PriceUpdate =
            serde_json::from_str(r#"{"sku": "A", "product_id": "1-2", "price": "9.99"}"#)
                .expect("deserialize");
        assert_eq!(update.sku(), "A");
        assert_eq!(
            update.product_id().map(ToString::to_string).as_deref(),
            Some("1-2")
        );
        assert_eq!(update.price, Decimal::new(999, 2));
    }
}
