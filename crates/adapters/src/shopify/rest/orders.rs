//! Order reads, acknowledgment and status transitions.

use chrono::{DateTime, Utc};
use marketsync_core::{CanonicalOrder, OrderStatus, Page, PageMeta, PageRequest, TrackingInfo};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    CountEnvelope, FulfillmentCreate, FulfillmentOrderRef, FulfillmentOrdersEnvelope,
    OrderEnvelope, OrdersEnvelope, split_tags,
};

use super::conversions::convert_order;
use super::{MAX_PAGE_SIZE, Query, ShopifyAdapter, ShopifySession, numeric_id};

/// Tag merged into an order's tags when it is acknowledged.
const ACKNOWLEDGED_TAG: &str = "acknowledged";

impl ShopifyAdapter {
    /// Orders created at or after `since`, any status.
    #[instrument(skip(self), fields(since = %since, page = request.page()))]
    pub(super) async fn list_orders(
        &self,
        since: DateTime<Utc>,
        request: &PageRequest,
    ) -> Result<Page<CanonicalOrder>, ShopifyError> {
        let session = self.session().await?;
        let page_size = request.page_size.clamp(1, MAX_PAGE_SIZE);
        let filters: Query = vec![
            ("status", "any".to_string()),
            ("created_at_min", since.to_rfc3339()),
        ];

        let total = self
            .get_json::<CountEnvelope>(&session, "orders/count.json", &filters)
            .await?
            .count;

        let Some((envelope, next_cursor)) = self
            .fetch_listing::<OrdersEnvelope>(&session, "orders.json", request, page_size, filters)
            .await?
        else {
            return Ok(Page {
                items: Vec::new(),
                meta: PageMeta::new(total, request.page(), page_size, None),
            });
        };

        Ok(Page {
            items: envelope
                .orders
                .iter()
                .map(|order| convert_order(order, &session.currency))
                .collect(),
            meta: PageMeta::new(total, request.page(), page_size, next_cursor),
        })
    }

    #[instrument(skip(self), fields(order_id = %id))]
    pub(super) async fn order_by_id(&self, id: &str) -> Result<CanonicalOrder, ShopifyError> {
        let session = self.session().await?;
        let order_id = numeric_id("order", id)?;
        let envelope = self
            .get_json::<OrderEnvelope>(&session, &format!("orders/{order_id}.json"), &[])
            .await?;
        Ok(convert_order(&envelope.order, &session.currency))
    }

    /// Merge the `acknowledged` tag into the order's tags. Idempotent.
    #[instrument(skip(self), fields(order_id = %id))]
    pub(super) async fn acknowledge(&self, id: &str) -> Result<(), ShopifyError> {
        let session = self.session().await?;
        let order_id = numeric_id("order", id)?;
        let path = format!("orders/{order_id}.json");

        let order = self
            .get_json::<OrderEnvelope>(&session, &path, &[])
            .await?
            .order;
        let mut tags = split_tags(order.tags.as_deref());
        if tags.iter().any(|t| t.eq_ignore_ascii_case(ACKNOWLEDGED_TAG)) {
            debug!(order_id, "Order already acknowledged");
            return Ok(());
        }

        tags.push(ACKNOWLEDGED_TAG.to_string());
        let body = json!({
            "order": {
                "id": order_id,
                "tags": tags.join(", "),
            }
        });
        self.write(&session, Method::PUT, &path, &body).await?;

        info!(order_id, "Order acknowledged");
        Ok(())
    }

    /// Push a status change: ship (with optional tracking), cancel or close.
    #[instrument(skip(self, tracking), fields(order_id = %id, status = %status))]
    pub(super) async fn transition_order(
        &self,
        id: &str,
        status: OrderStatus,
        tracking: Option<&TrackingInfo>,
    ) -> Result<(), ShopifyError> {
        let session = self.session().await?;
        let order_id = numeric_id("order", id)?;

        match status {
            OrderStatus::Shipped => self.fulfill(&session, order_id, tracking).await?,
            OrderStatus::Cancelled => {
                self.write(
                    &session,
                    Method::POST,
                    &format!("orders/{order_id}/cancel.json"),
                    &json!({}),
                )
                .await?;
            }
            OrderStatus::Completed => {
                self.write(
                    &session,
                    Method::POST,
                    &format!("orders/{order_id}/close.json"),
                    &json!({}),
                )
                .await?;
            }
            other => {
                return Err(ShopifyError::Validation(format!(
                    "orders cannot be moved to {other} on Shopify"
                )));
            }
        }

        info!(order_id, %status, "Order status updated");
        Ok(())
    }

    /// Fulfill every open fulfillment order of an order.
    async fn fulfill(
        &self,
        session: &ShopifySession,
        order_id: u64,
        tracking: Option<&TrackingInfo>,
    ) -> Result<(), ShopifyError> {
        let fulfillment_orders = self
            .get_json::<FulfillmentOrdersEnvelope>(
                session,
                &format!("orders/{order_id}/fulfillment_orders.json"),
                &[],
            )
            .await?
            .fulfillment_orders;

        let open: Vec<FulfillmentOrderRef> = fulfillment_orders
            .iter()
            .filter(|fo| fo.is_fulfillable())
            .map(|fo| FulfillmentOrderRef {
                fulfillment_order_id: fo.id,
            })
            .collect();
        if open.is_empty() {
            return Err(ShopifyError::Validation(format!(
                "order {order_id} has no open fulfillment orders"
            )));
        }

        let fulfillment = FulfillmentCreate {
            line_items_by_fulfillment_order: open,
            notify_customer: false,
            tracking_info: tracking,
        };
        self.write(
            session,
            Method::POST,
            "fulfillments.json",
            &json!({ "fulfillment": fulfillment }),
        )
        .await
    }
}
