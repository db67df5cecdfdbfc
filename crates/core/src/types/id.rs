//! Newtype IDs for platform entity references.
//!
//! Platform ids are opaque strings at the canonical level. Use the
//! `define_id!` macro to create type-safe wrappers that prevent accidentally
//! mixing ids from different entity types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use marketsync_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShipmentId);
///
/// let warehouse = WarehouseId::new("42");
/// let shipment = ShipmentId::new("42");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shipment;
/// # let _ = (warehouse, shipment);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Platform entity IDs
define_id!(ProductId);
define_id!(VariantId);
define_id!(OrderId);
define_id!(CategoryId);
define_id!(LocationId);

/// Separator between the product and variant halves of a composite id.
const COMPOSITE_SEPARATOR: char = '-';

/// Canonical product identifier: `"{productId}-{variantId}"`.
///
/// Every write path that receives a canonical id splits it back into platform
/// ids through [`CompositeProductId::from_str`]. A bare product id (no
/// separator) is accepted and leaves the variant unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompositeProductId {
    product_id: ProductId,
    variant_id: Option<VariantId>,
}

impl CompositeProductId {
    /// Join a product and variant id.
    #[must_use]
    pub const fn new(product_id: ProductId, variant_id: VariantId) -> Self {
        Self {
            product_id,
            variant_id: Some(variant_id),
        }
    }

    /// Reference a product without naming a variant.
    #[must_use]
    pub const fn product_only(product_id: ProductId) -> Self {
        Self {
            product_id,
            variant_id: None,
        }
    }

    /// Platform product id.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Platform variant id, if the composite named one.
    #[must_use]
    pub const fn variant_id(&self) -> Option<&VariantId> {
        self.variant_id.as_ref()
    }
}

impl std::fmt::Display for CompositeProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variant_id {
            Some(variant) => write!(f, "{}{COMPOSITE_SEPARATOR}{variant}", self.product_id),
            None => write!(f, "{}", self.product_id),
        }
    }
}

impl FromStr for CompositeProductId {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MarketplaceError::Validation(
                "product id must not be empty".to_string(),
            ));
        }

        match s.split_once(COMPOSITE_SEPARATOR) {
            Some((product, variant)) => {
                if product.is_empty() || variant.is_empty() {
                    return Err(MarketplaceError::Validation(format!(
                        "malformed product id: {s}"
                    )));
                }
                Ok(Self::new(product.into(), variant.into()))
            }
            None => Ok(Self::product_only(s.into())),
        }
    }
}

impl TryFrom<String> for CompositeProductId {
    type Error = MarketplaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompositeProductId> for String {
    fn from(id: CompositeProductId) -> Self {
        id.to_string()
    }
}
