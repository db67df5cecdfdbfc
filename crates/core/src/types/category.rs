//! Canonical taxonomy types.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Platform category id.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Parent category, for hierarchical taxonomies.
    pub parent_id: Option<CategoryId>,
    /// URL handle or slug.
    pub handle: Option<String>,
}

/// Value type of a category attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Text,
    Html,
    Number,
    Decimal,
    List,
    Enum,
}

/// An attribute products in a category may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAttribute {
    /// Machine name.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Value type.
    pub kind: AttributeKind,
    /// Whether a value is mandatory.
    pub required: bool,
    /// Allowed values for [`AttributeKind::Enum`] attributes.
    pub allowed_values: Vec<String>,
}
