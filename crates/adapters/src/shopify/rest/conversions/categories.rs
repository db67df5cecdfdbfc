//! Custom collections as canonical categories.
//!
//! Shopify has no category tree: custom collections are flat and every
//! product accepts the same attribute set regardless of collection.

use marketsync_core::{AttributeKind, Category, CategoryAttribute, CategoryId};

use crate::shopify::types::CustomCollection;

pub fn convert_collection(collection: &CustomCollection) -> Category {
    Category {
        id: CategoryId::new(collection.id.to_string()),
        name: collection.title.clone(),
        parent_id: None,
        handle: collection.handle.clone(),
    }
}

/// Product attributes Shopify accepts, shared by every collection.
pub fn product_attribute_schema() -> Vec<CategoryAttribute> {
    vec![
        attribute("title", "Title", AttributeKind::Text, true, &[]),
        attribute("body_html", "Description", AttributeKind::Html, false, &[]),
        attribute("vendor", "Vendor", AttributeKind::Text, false, &[]),
        attribute("product_type", "Product type", AttributeKind::Text, false, &[]),
        attribute("tags", "Tags", AttributeKind::List, false, &[]),
        attribute("price", "Price", AttributeKind::Decimal, true, &[]),
        attribute("compare_at_price", "Compare-at price", AttributeKind::Decimal, false, &[]),
        attribute("sku", "SKU", AttributeKind::Text, false, &[]),
        attribute("barcode", "Barcode", AttributeKind::Text, false, &[]),
        attribute("weight", "Weight", AttributeKind::Number, false, &[]),
        attribute("weight_unit", "Weight unit", AttributeKind::Enum, false, &["g", "kg", "oz", "lb"]),
        attribute("inventory_quantity", "Inventory", AttributeKind::Number, false, &[]),
        attribute(
            "status",
            "Status",
            AttributeKind::Enum,
            false,
            &["active", "archived", "draft"],
        ),
    ]
}

fn attribute(
    name: &str,
    label: &str,
    kind: AttributeKind,
    required: bool,
    allowed_values: &[&str],
) -> CategoryAttribute {
    CategoryAttribute {
        name: name.to_string(),
        label: label.to_string(),
        kind,
        required,
        allowed_values: allowed_values.iter().map(ToString::to_string).collect(),
    }
}
