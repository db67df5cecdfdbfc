//! Order commands.

use chrono::{DateTime, Utc};
use marketsync_adapters::ShopifyAdapter;
use marketsync_core::{MarketplaceAdapter, PageRequest};
use tracing::info;

use super::print_json;

/// Print orders created at or after `since`.
///
/// # Errors
///
/// Returns an error if the listing request fails.
pub async fn list(
    adapter: &ShopifyAdapter,
    since: DateTime<Utc>,
    page: u32,
    page_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let orders = adapter
        .get_recent_orders(since, PageRequest::new(page, page_size))
        .await?;
    print_json(&orders)
}

/// Print one order.
///
/// # Errors
///
/// Returns an error if the order does not exist or the request fails.
pub async fn show(adapter: &ShopifyAdapter, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let order = adapter.get_order_by_id(id).await?;
    print_json(&order)
}

/// Mark an order as received.
///
/// # Errors
///
/// Returns an error if the order does not exist or the update fails.
pub async fn acknowledge(
    adapter: &ShopifyAdapter,
    id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    adapter.acknowledge_order(id).await?;
    info!(order_id = id, "Order acknowledged");
    print_json(&serde_json::json!({ "acknowledged": id }))
}
