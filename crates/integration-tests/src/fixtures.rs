//! JSON payloads shaped like Shopify Admin API responses.

use serde_json::{Value, json};

use crate::STORE;

/// Currency the mock shop reports.
pub const SHOP_CURRENCY: &str = "CAD";

#[must_use]
pub fn shop() -> Value {
    json!({
        "shop": {
            "id": 690_933_842,
            "name": "Marketsync Test",
            "currency": SHOP_CURRENCY,
            "myshopify_domain": STORE,
        }
    })
}

/// A variant as `(id, sku, price)`.
#[must_use]
pub fn variant(id: u64, sku: &str, price: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Size {sku}"),
        "sku": sku,
        "price": price,
        "compare_at_price": null,
        "inventory_quantity": 10,
        "inventory_item_id": id + 1_000,
        "weight": 0.2,
        "weight_unit": "kg",
        "barcode": null,
    })
}

#[must_use]
pub fn product(id: u64, title: &str, variants: Vec<Value>) -> Value {
    json!({
        "id": id,
        "title": title,
        "body_html": "<p>Soft cotton tee</p>",
        "vendor": "Marketsync",
        "product_type": "Shirts",
        "handle": title.to_lowercase().replace(' ', "-"),
        "status": "active",
        "tags": "summer, cotton",
        "created_at": "2024-03-01T10:00:00-05:00",
        "updated_at": "2024-03-02T10:00:00-05:00",
        "variants": variants,
        "images": [],
    })
}

#[must_use]
pub fn products(products: Vec<Value>) -> Value {
    json!({ "products": products })
}

/// The standard two-product catalog: `TEE-S`, `TEE-M` and `MUG-1`.
#[must_use]
pub fn catalog() -> Value {
    products(vec![
        product(
            632_910_392,
            "Cotton Tee",
            vec![
                variant(808_950_810, "TEE-S", "25.00"),
                variant(808_950_811, "TEE-M", "25.00"),
            ],
        ),
        product(
            921_728_736,
            "Enamel Mug",
            vec![variant(447_654_529, "MUG-1", "12.50")],
        ),
    ])
}

#[must_use]
pub fn count(count: u64) -> Value {
    json!({ "count": count })
}

/// An order with subtotal 100, shipping 10, tax 8 and discount 5.
#[must_use]
pub fn order(id: u64, fulfillment_status: Option<&str>, tags: &str) -> Value {
    json!({
        "id": id,
        "order_number": 1001,
        "name": "#1001",
        "email": "bob.norman@mail.example.com",
        "created_at": "2024-05-01T09:30:00-04:00",
        "updated_at": "2024-05-01T09:35:00-04:00",
        "cancelled_at": null,
        "closed_at": null,
        "financial_status": "paid",
        "fulfillment_status": fulfillment_status,
        "currency": "USD",
        "subtotal_price": "100.00",
        "total_tax": "8.00",
        "total_discounts": "5.00",
        "total_price": "999.00",
        "total_shipping_price_set": {
            "shop_money": { "amount": "10.00", "currency_code": "USD" }
        },
        "shipping_lines": [],
        "tags": tags,
        "customer": {
            "id": 207_119_551,
            "email": "bob.norman@mail.example.com",
            "first_name": "Bob",
            "last_name": "Norman",
        },
        "line_items": [{
            "product_id": 632_910_392,
            "variant_id": 808_950_810,
            "sku": "TEE-S",
            "title": "Cotton Tee",
            "variant_title": "S",
            "quantity": 4,
            "price": "25.00",
        }],
        "shipping_address": {
            "name": "Bob Norman",
            "address1": "Chestnut Street 92",
            "city": "Louisville",
            "province_code": "KY",
            "zip": "40202",
            "country_code": "US",
        },
    })
}

/// Locations as `(id, active)`.
#[must_use]
pub fn locations(locations: &[(u64, bool)]) -> Value {
    let locations: Vec<Value> = locations
        .iter()
        .map(|(id, active)| json!({ "id": id, "name": format!("Warehouse {id}"), "active": active }))
        .collect();
    json!({ "locations": locations })
}

/// Fulfillment orders as `(id, status)`.
#[must_use]
pub fn fulfillment_orders(orders: &[(u64, &str)]) -> Value {
    let orders: Vec<Value> = orders
        .iter()
        .map(|(id, status)| json!({ "id": id, "status": status }))
        .collect();
    json!({ "fulfillment_orders": orders })
}

#[must_use]
pub fn custom_collections(collections: &[(u64, &str)]) -> Value {
    let collections: Vec<Value> = collections
        .iter()
        .map(|(id, title)| {
            json!({ "id": id, "title": title, "handle": title.to_lowercase() })
        })
        .collect();
    json!({ "custom_collections": collections })
}
