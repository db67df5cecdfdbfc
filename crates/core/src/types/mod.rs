//! Canonical types for marketplace integrations.
//!
//! This module provides the platform-agnostic records every adapter
//! normalizes to and from.

pub mod category;
pub mod credential;
pub mod id;
pub mod money;
pub mod order;
pub mod pagination;
pub mod product;
pub mod status;
pub mod update;

pub use category::{AttributeKind, Category, CategoryAttribute};
pub use credential::Credentials;
pub use id::*;
pub use money::{OrderTotals, round_money};
pub use order::{Address, CanonicalOrder, CustomerSnapshot, OrderLineItem, TrackingInfo};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageMeta, PageRequest};
pub use product::{CanonicalProduct, PlatformFields, ProductFilters};
pub use status::*;
pub use update::{ItemRef, PriceUpdate, StatusUpdate, StockUpdate};
