//! Order conversion functions.

use marketsync_core::{
    Address, CanonicalOrder, CustomerSnapshot, OrderId, OrderLineItem, OrderStatus, OrderTotals,
    PaymentStatus, ShippingStatus, round_money,
};
use rust_decimal::Decimal;

use crate::shopify::types::{ShopifyAddress, ShopifyLineItem, ShopifyOrder, split_tags};

use super::parse_amount;

/// Convert an order. `fallback_currency` is used when the order omits one.
pub fn convert_order(order: &ShopifyOrder, fallback_currency: &str) -> CanonicalOrder {
    let customer = order.customer.as_ref();

    CanonicalOrder {
        id: OrderId::new(order.id.to_string()),
        number: order.order_number.map_or_else(
            || {
                order
                    .name
                    .as_deref()
                    .map_or_else(|| order.id.to_string(), |n| n.trim_start_matches('#').to_string())
            },
            |n| n.to_string(),
        ),
        name: order.name.clone(),
        customer: CustomerSnapshot {
            id: customer.and_then(|c| c.id).map(|id| id.to_string()),
            email: customer
                .and_then(|c| c.email.clone())
                .or_else(|| order.email.clone()),
            first_name: customer.and_then(|c| c.first_name.clone()),
            last_name: customer.and_then(|c| c.last_name.clone()),
            phone: customer
                .and_then(|c| c.phone.clone())
                .or_else(|| order.phone.clone()),
        },
        line_items: order.line_items.iter().map(convert_line_item).collect(),
        totals: order_totals(order),
        status: order_status_from_shopify(order),
        payment_status: payment_status_from_shopify(order.financial_status.as_deref()),
        shipping_status: shipping_status_from_shopify(order.fulfillment_status.as_deref()),
        shipping_address: order.shipping_address.as_ref().map(convert_address),
        billing_address: order.billing_address.as_ref().map(convert_address),
        currency: order
            .currency
            .clone()
            .unwrap_or_else(|| fallback_currency.to_string()),
        created_at: order.created_at,
        updated_at: order.updated_at,
        note: order.note.clone().filter(|n| !n.is_empty()),
        tags: split_tags(order.tags.as_deref()),
    }
}

/// Overall order status, checked in precedence order:
/// cancelled, closed, fulfilled, paid, otherwise pending.
pub fn order_status_from_shopify(order: &ShopifyOrder) -> OrderStatus {
    if order.cancelled_at.is_some() {
        OrderStatus::Cancelled
    } else if order.closed_at.is_some() {
        OrderStatus::Completed
    } else if order.fulfillment_status.as_deref() == Some("fulfilled") {
        OrderStatus::Shipped
    } else if order.financial_status.as_deref() == Some("paid") {
        OrderStatus::Processing
    } else {
        OrderStatus::Pending
    }
}

/// Map a Shopify financial status; unknown values become `Unknown`.
pub fn payment_status_from_shopify(status: Option<&str>) -> PaymentStatus {
    match status {
        Some("pending") => PaymentStatus::Pending,
        Some("authorized") => PaymentStatus::Authorized,
        Some("partially_paid") => PaymentStatus::PartiallyPaid,
        Some("paid") => PaymentStatus::Paid,
        Some("partially_refunded") => PaymentStatus::PartiallyRefunded,
        Some("refunded") => PaymentStatus::Refunded,
        Some("voided") => PaymentStatus::Voided,
        _ => PaymentStatus::Unknown,
    }
}

/// Map a Shopify fulfillment status; `null` and unknown values become
/// `AwaitingFulfillment`.
pub fn shipping_status_from_shopify(status: Option<&str>) -> ShippingStatus {
    match status {
        Some("partial") => ShippingStatus::PartiallyShipped,
        Some("fulfilled") => ShippingStatus::Shipped,
        Some("restocked") => ShippingStatus::Restocked,
        _ => ShippingStatus::AwaitingFulfillment,
    }
}

fn order_totals(order: &ShopifyOrder) -> OrderTotals {
    let shipping = order.total_shipping_price_set.as_ref().map_or_else(
        || {
            order
                .shipping_lines
                .iter()
                .map(|line| parse_amount(line.price.as_deref(), "shipping_lines.price"))
                .sum()
        },
        |set| parse_amount(Some(&set.shop_money.amount), "total_shipping_price_set"),
    );

    OrderTotals::compute(
        parse_amount(order.subtotal_price.as_deref(), "subtotal_price"),
        shipping,
        parse_amount(order.total_tax.as_deref(), "total_tax"),
        parse_amount(order.total_discounts.as_deref(), "total_discounts"),
    )
}

fn convert_line_item(item: &ShopifyLineItem) -> OrderLineItem {
    let unit_price = parse_amount(item.price.as_deref(), "line_items.price");
    OrderLineItem {
        product_id: item.product_id.map(|id| id.to_string().into()),
        variant_id: item.variant_id.map(|id| id.to_string().into()),
        sku: item.sku.clone().filter(|s| !s.is_empty()),
        title: super::variant_title(
            item.title.as_deref().unwrap_or_default(),
            item.variant_title.as_deref(),
        ),
        quantity: item.quantity,
        unit_price,
        line_total: round_money(unit_price * Decimal::from(item.quantity)),
    }
}

fn convert_address(address: &ShopifyAddress) -> Address {
    let name = address.name.clone().or_else(|| {
        match (address.first_name.as_deref(), address.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    });

    Address {
        name,
        company: address.company.clone(),
        address1: address.address1.clone(),
        address2: address.address2.clone(),
        city: address.city.clone(),
        province: address.province.clone(),
        province_code: address.province_code.clone(),
        zip: address.zip.clone(),
        country: address.country.clone(),
        country_code: address.country_code.clone(),
        phone: address.phone.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> ShopifyOrder {
        serde_json::from_value(serde_json::json!({
            "id": 450_789_469,
            "order_number": 1001,
            "name": "#1001",
            "email": "bob.norman@mail.example.com",
            "created_at": "2024-03-13T16:09:54-04:00",
            "financial_status": "paid",
            "fulfillment_status": null,
            "currency": "USD",
            "subtotal_price": "100.00",
            "total_tax": "8.00",
            "total_discounts": "5.00",
            "total_price": "999.99",
            "shipping_lines": [{"title": "Ground", "price": "10.00"}],
            "tags": "wholesale, rush",
            "customer": {"id": 207_119_551, "first_name": "Bob", "last_name": "Norman"},
            "line_items": [
                {
                    "product_id": 632_910_392,
                    "variant_id": 808_950_810,
                    "sku": "IPOD2008PINK",
                    "title": "IPod Nano - 8GB",
                    "variant_title": "Pink",
                    "quantity": 2,
                    "price": "50.00"
                }
            ],
            "shipping_address": {"first_name": "Bob", "last_name": "Norman", "city": "Ottawa", "country_code": "CA"}
        }))
        .expect("valid order")
    }

    #[test]
    fn test_sample_order_totals() {
        let order = convert_order(&sample_order(), "CAD");
        assert_eq!(order.totals.subtotal, Decimal::from(100));
        assert_eq!(order.totals.shipping, Decimal::from(10));
        assert_eq!(order.totals.tax, Decimal::from(8));
        assert_eq!(order.totals.discount, Decimal::from(5));
        // computed, not copied from total_price
        assert_eq!(order.totals.total, Decimal::from(113));
    }

    #[test]
    fn test_convert_order_fields() {
        let order = convert_order(&sample_order(), "CAD");
        assert_eq!(order.id.as_str(), "450789469");
        assert_eq!(order.number, "1001");
        assert_eq!(order.currency, "USD");
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.shipping_status, ShippingStatus::AwaitingFulfillment);
        assert_eq!(order.customer.email.as_deref(), Some("bob.norman@mail.example.com"));
        assert_eq!(order.customer.id.as_deref(), Some("207119551"));
        assert_eq!(order.tags, vec!["wholesale", "rush"]);

        let line = order.line_items.first().expect("line item");
        assert_eq!(line.title, "IPod Nano - 8GB - Pink");
        assert_eq!(line.line_total, Decimal::from(100));
        assert_eq!(
            order.shipping_address.and_then(|a| a.name).as_deref(),
            Some("Bob Norman")
        );
    }

    #[test]
    fn test_unknown_fulfillment_status_awaits_fulfillment() {
        assert_eq!(
            shipping_status_from_shopify(Some("on_the_moon")),
            ShippingStatus::AwaitingFulfillment
        );
        assert_eq!(shipping_status_from_shopify(None), ShippingStatus::AwaitingFulfillment);
        assert_eq!(
            shipping_status_from_shopify(Some("unfulfilled")),
            ShippingStatus::AwaitingFulfillment
        );
        assert_eq!(
            shipping_status_from_shopify(Some("partial")),
            ShippingStatus::PartiallyShipped
        );
    }

    #[test]
    fn test_unknown_financial_status() {
        assert_eq!(payment_status_from_shopify(Some("expired")), PaymentStatus::Unknown);
        assert_eq!(payment_status_from_shopify(None), PaymentStatus::Unknown);
        assert_eq!(
            payment_status_from_shopify(Some("partially_refunded")),
            PaymentStatus::PartiallyRefunded
        );
    }

    #[test]
    fn test_order_status_precedence() {
        let mut order = sample_order();
        order.fulfillment_status = Some("fulfilled".to_string());
        assert_eq!(order_status_from_shopify(&order), OrderStatus::Shipped);

        order.closed_at = order.created_at;
        assert_eq!(order_status_from_shopify(&order), OrderStatus::Completed);

        order.cancelled_at = order.created_at;
        assert_eq!(order_status_from_shopify(&order), OrderStatus::Cancelled);

        let mut pending = sample_order();
        pending.financial_status = Some("pending".to_string());
        assert_eq!(order_status_from_shopify(&pending), OrderStatus::Pending);
    }

    #[test]
    fn test_shipping_price_set_wins_over_lines() {
        let mut order: ShopifyOrder = sample_order();
        order.total_shipping_price_set = serde_json::from_value(serde_json::json!({
            "shop_money": {"amount": "12.50", "currency_code": "USD"}
        }))
        .expect("valid money set");
        let totals = convert_order(&order, "USD").totals;
        assert_eq!(totals.shipping, Decimal::new(1250, 2));
        assert_eq!(totals.total, Decimal::new(11550, 2));
    }
}
