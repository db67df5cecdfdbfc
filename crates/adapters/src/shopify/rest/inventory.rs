//! Stock writes and default location resolution.

use marketsync_core::{BatchReport, CompositeProductId, MarketplaceError, StockUpdate};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::shopify::ShopifyError;
use crate::shopify::types::{InventoryLevelSet, LocationsEnvelope, VariantEnvelope};

use super::products::{Resolution, Target, target};
use super::{ShopifyAdapter, ShopifySession, numeric_id};

impl ShopifyAdapter {
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub(super) async fn write_stock(&self, items: &[StockUpdate]) -> BatchReport {
        let (session, resolution) = match self.begin_batch(items).await {
            Ok(started) => started,
            Err(report) => return report,
        };
        let (session, resolution) = (&*session, &resolution);

        self.inner
            .batch
            .run(
                "update_stock",
                items,
                |item| item.sku.clone(),
                |item| self.write_stock_level(session, resolution, item),
            )
            .await
    }

    async fn write_stock_level(
        &self,
        session: &ShopifySession,
        resolution: &Resolution,
        item: &StockUpdate,
    ) -> Result<(), MarketplaceError> {
        let inventory_item_id = match target(item, resolution)? {
            Target::Scanned(product) => match product.platform.inventory_item_id.as_deref() {
                Some(id) => numeric_id("inventory item", id)?,
                None => self.inventory_item_for(session, &product.id).await?,
            },
            Target::Known(id) => self.inventory_item_for(session, id).await?,
        };
        let location_id = self.default_location(session).await?;

        let level = InventoryLevelSet {
            location_id,
            inventory_item_id,
            available: item.quantity,
        };
        let body = json!(level);
        if let Err(e) = self
            .write(session, Method::POST, "inventory_levels/set.json", &body)
            .await
        {
            if matches!(e, ShopifyError::NotFound(_) | ShopifyError::Validation(_)) {
                self.forget_default_location(session).await;
            }
            return Err(e.into());
        }

        info!(
            sku = %item.sku,
            inventory_item_id,
            location_id,
            quantity = item.quantity,
            "Stock updated"
        );
        Ok(())
    }

    async fn inventory_item_for(
        &self,
        session: &ShopifySession,
        id: &CompositeProductId,
    ) -> Result<u64, ShopifyError> {
        let inventory_item_id = match id.variant_id() {
            Some(variant_id) => {
                let variant_id = numeric_id("variant", variant_id.as_str())?;
                self.get_json::<VariantEnvelope>(session, &format!("variants/{variant_id}.json"), &[])
                    .await?
                    .variant
                    .inventory_item_id
            }
            None => self
                .fetch_product(session, id)
                .await?
                .variants
                .first()
                .and_then(|v| v.inventory_item_id),
        };
        inventory_item_id
            .ok_or_else(|| ShopifyError::NotFound(format!("inventory item for product {id}")))
    }

    /// Location stock writes apply to.
    ///
    /// Re-resolved on every call unless `cache_default_location` is set, in
    /// which case the first resolution is kept for the session.
    async fn default_location(&self, session: &ShopifySession) -> Result<u64, ShopifyError> {
        if !self.inner.config.cache_default_location {
            return self.resolve_default_location(session).await;
        }

        let mut cached = session.default_location.lock().await;
        if let Some(location_id) = *cached {
            return Ok(location_id);
        }
        let location_id = self.resolve_default_location(session).await?;
        *cached = Some(location_id);
        Ok(location_id)
    }

    async fn forget_default_location(&self, session: &ShopifySession) {
        if self.inner.config.cache_default_location
            && session.default_location.lock().await.take().is_some()
        {
            debug!("Dropped cached default location");
        }
    }

    /// First active location, else the first location. Any failure is
    /// reported as a transport error; the next write tries again.
    async fn resolve_default_location(
        &self,
        session: &ShopifySession,
    ) -> Result<u64, ShopifyError> {
        let locations = self
            .get_json::<LocationsEnvelope>(session, "locations.json", &[])
            .await
            .map_err(|e| {
                MarketplaceError::Transport(format!(
                    "default location resolution failed: {}",
                    MarketplaceError::from(e)
                ))
            })?
            .locations;

        let location = locations
            .iter()
            .find(|l| l.active)
            .or_else(|| locations.first())
            .ok_or_else(|| {
                MarketplaceError::Transport(
                    "default location resolution failed: shop has no locations".to_string(),
                )
            })?;

        debug!(location_id = location.id, name = ?location.name, "Resolved default location");
        Ok(location.id)
    }
}
