//! Product reads, SKU resolution and price/status writes.

use std::collections::{HashMap, HashSet};

use marketsync_core::{
    BatchReport, CanonicalProduct, CompositeProductId, ItemRef, MarketplaceError, Page, PageMeta,
    PageRequest, PriceUpdate, ProductFilters, StatusUpdate,
};
use reqwest::Method;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    CountEnvelope, ProductEnvelope, ProductsEnvelope, ShopifyProduct, ShopifyVariant,
    VariantPriceUpdate,
};

use super::conversions::{convert_variant, product_status_to_shopify};
use super::{MAX_PAGE_SIZE, Query, ShopifyAdapter, ShopifySession, cursor_query, numeric_id};

/// Outcome of the up-front SKU scan for a batch, keyed by SKU.
///
/// An `Err` means the scan itself failed; every item that needed it fails
/// with that error.
pub(super) type Resolution = Result<HashMap<String, CanonicalProduct>, MarketplaceError>;

/// Where a batch item points.
pub(super) enum Target<'a> {
    /// Caller supplied the canonical id.
    Known(&'a CompositeProductId),
    /// Found by SKU scan.
    Scanned(&'a CanonicalProduct),
}

impl Target<'_> {
    pub(super) const fn id(&self) -> &CompositeProductId {
        match self {
            Self::Known(id) => *id,
            Self::Scanned(product) => &product.id,
        }
    }
}

/// Resolve a batch item against the pre-scan.
pub(super) fn target<'a, T: ItemRef>(
    item: &'a T,
    resolution: &'a Resolution,
) -> Result<Target<'a>, ShopifyError> {
    if let Some(id) = item.product_id() {
        return Ok(Target::Known(id));
    }
    match resolution {
        Ok(found) => found
            .get(item.sku())
            .map(Target::Scanned)
            .ok_or_else(|| ShopifyError::NotFound(format!("SKU {}", item.sku()))),
        Err(e) => Err(ShopifyError::Local(e.clone())),
    }
}

fn product_filter_query(filters: &ProductFilters) -> Query {
    let mut query = Query::new();
    if let Some(status) = filters.status {
        query.push(("status", product_status_to_shopify(status).to_string()));
    }
    if let Some(vendor) = &filters.vendor {
        query.push(("vendor", vendor.clone()));
    }
    if let Some(product_type) = &filters.product_type {
        query.push(("product_type", product_type.clone()));
    }
    if let Some(updated_since) = filters.updated_since {
        query.push(("updated_at_min", updated_since.to_rfc3339()));
    }
    query
}

fn select_variant<'a>(
    product: &'a ShopifyProduct,
    id: &CompositeProductId,
) -> Result<&'a ShopifyVariant, ShopifyError> {
    let variant = match id.variant_id() {
        Some(variant_id) => product
            .variants
            .iter()
            .find(|v| v.id.to_string() == variant_id.as_str()),
        None => product.variants.first(),
    };
    variant.ok_or_else(|| ShopifyError::NotFound(format!("variant for product {id}")))
}

impl ShopifyAdapter {
    #[instrument(skip(self), fields(sku = %sku))]
    pub(super) async fn product_by_sku(&self, sku: &str) -> Result<CanonicalProduct, ShopifyError> {
        let session = self.session().await?;
        if sku.trim().is_empty() {
            return Err(ShopifyError::Validation("SKU must not be empty".to_string()));
        }

        self.scan_skus(&session, &[sku])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ShopifyError::NotFound(format!("SKU {sku}")))
    }

    /// Accepts a composite `"{product}-{variant}"` id or a bare product id
    /// (which resolves to the first variant).
    #[instrument(skip(self), fields(product_id = %id))]
    pub(super) async fn product_by_id(&self, id: &str) -> Result<CanonicalProduct, ShopifyError> {
        let session = self.session().await?;
        let id: CompositeProductId = id.parse()?;

        let product = self.fetch_product(&session, &id).await?;
        let variant = select_variant(&product, &id)?;
        Ok(convert_variant(&product, variant, &session.currency))
    }

    #[instrument(skip(self, skus), fields(count = skus.len()))]
    pub(super) async fn products_by_skus(
        &self,
        skus: &[String],
    ) -> Result<Vec<CanonicalProduct>, ShopifyError> {
        let session = self.session().await?;
        let skus: Vec<&str> = skus.iter().map(String::as_str).collect();
        self.scan_skus(&session, &skus).await
    }

    /// One page of products, one item per variant.
    ///
    /// `meta.total` comes from `products/count.json` and counts products, not
    /// variants.
    #[instrument(skip(self, filters), fields(page = request.page(), page_size = request.page_size))]
    pub(super) async fn list_products(
        &self,
        request: &PageRequest,
        filters: &ProductFilters,
    ) -> Result<Page<CanonicalProduct>, ShopifyError> {
        let session = self.session().await?;
        let page_size = request.page_size.clamp(1, MAX_PAGE_SIZE);
        let filter_query = product_filter_query(filters);

        let total = self
            .get_json::<CountEnvelope>(&session, "products/count.json", &filter_query)
            .await?
            .count;

        let Some((envelope, next_cursor)) = self
            .fetch_listing::<ProductsEnvelope>(
                &session,
                "products.json",
                request,
                page_size,
                filter_query,
            )
            .await?
        else {
            return Ok(Page {
                items: Vec::new(),
                meta: PageMeta::new(total, request.page(), page_size, None),
            });
        };

        let currency = session.currency.as_str();
        let items = envelope
            .products
            .iter()
            .flat_map(|product| {
                product
                    .variants
                    .iter()
                    .map(move |variant| convert_variant(product, variant, currency))
            })
            .collect();

        Ok(Page {
            items,
            meta: PageMeta::new(total, request.page(), page_size, next_cursor),
        })
    }

    /// Scan `products.json` for the given SKUs, at most `sku_scan_pages` pages
    /// of 250. Stops as soon as every SKU has been found; SKUs still missing
    /// afterwards are logged and left out of the result.
    pub(super) async fn scan_skus(
        &self,
        session: &ShopifySession,
        skus: &[&str],
    ) -> Result<Vec<CanonicalProduct>, ShopifyError> {
        let mut pending: HashSet<&str> = skus.iter().copied().filter(|s| !s.is_empty()).collect();
        let mut found = Vec::with_capacity(pending.len());
        let mut query = vec![("limit", MAX_PAGE_SIZE.to_string())];
        let mut pages_scanned = 0;

        while !pending.is_empty() && pages_scanned < self.inner.config.sku_scan_pages {
            let (envelope, next_cursor) = self
                .get_page::<ProductsEnvelope>(session, "products.json", &query)
                .await?;
            pages_scanned += 1;

            for product in &envelope.products {
                for variant in &product.variants {
                    if let Some(sku) = variant.sku.as_deref()
                        && pending.remove(sku)
                    {
                        found.push(convert_variant(product, variant, &session.currency));
                    }
                }
            }

            match next_cursor {
                Some(cursor) => query = cursor_query(MAX_PAGE_SIZE, &cursor),
                None => break,
            }
        }

        if !pending.is_empty() {
            let mut missing: Vec<&str> = pending.into_iter().collect();
            missing.sort_unstable();
            warn!(?missing, pages_scanned, "SKUs not found in product scan");
        }
        Ok(found)
    }

    pub(super) async fn fetch_product(
        &self,
        session: &ShopifySession,
        id: &CompositeProductId,
    ) -> Result<ShopifyProduct, ShopifyError> {
        let product_id = numeric_id("product", id.product_id().as_str())?;
        Ok(self
            .get_json::<ProductEnvelope>(session, &format!("products/{product_id}.json"), &[])
            .await?
            .product)
    }

    /// Resolve every item that carries no canonical id with one SKU scan.
    pub(super) async fn resolve_skus<T: ItemRef>(
        &self,
        session: &ShopifySession,
        items: &[T],
    ) -> Resolution {
        let skus: Vec<&str> = items
            .iter()
            .filter(|item| item.product_id().is_none())
            .map(ItemRef::sku)
            .collect();
        if skus.is_empty() {
            return Ok(HashMap::new());
        }

        match self.scan_skus(session, &skus).await {
            Ok(found) => Ok(found.into_iter().map(|p| (p.sku.clone(), p)).collect()),
            Err(e) => {
                let err = MarketplaceError::from(e);
                warn!(error = %err, unresolved = skus.len(), "SKU resolution failed for batch");
                Err(err)
            }
        }
    }

    /// Session and SKU resolution shared by every batch write. A missing
    /// session fails the whole batch up front.
    pub(super) async fn begin_batch<T: ItemRef>(
        &self,
        items: &[T],
    ) -> Result<(std::sync::Arc<ShopifySession>, Resolution), BatchReport> {
        let session = match self.session().await {
            Ok(session) => session,
            Err(e) => {
                return Err(BatchReport::all_failed(
                    items.iter().map(|item| item.sku().to_string()),
                    &e.into(),
                ));
            }
        };
        let resolution = self.resolve_skus(&session, items).await;
        Ok((session, resolution))
    }

    /// Variant id for a canonical id; a bare product id uses its first variant.
    async fn variant_id_for(
        &self,
        session: &ShopifySession,
        id: &CompositeProductId,
    ) -> Result<u64, ShopifyError> {
        match id.variant_id() {
            Some(variant_id) => numeric_id("variant", variant_id.as_str()),
            None => {
                let product = self.fetch_product(session, id).await?;
                Ok(select_variant(&product, id)?.id)
            }
        }
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    pub(super) async fn write_prices(&self, items: &[PriceUpdate]) -> BatchReport {
        let (session, resolution) = match self.begin_batch(items).await {
            Ok(started) => started,
            Err(report) => return report,
        };
        let (session, resolution) = (&*session, &resolution);

        self.inner
            .batch
            .run(
                "update_prices",
                items,
                |item| item.sku.clone(),
                |item| self.write_price(session, resolution, item),
            )
            .await
    }

    async fn write_price(
        &self,
        session: &ShopifySession,
        resolution: &Resolution,
        item: &PriceUpdate,
    ) -> Result<(), MarketplaceError> {
        if item.price.is_sign_negative() {
            return Err(MarketplaceError::Validation(format!(
                "price for {} must not be negative",
                item.sku
            )));
        }

        let target = target(item, resolution)?;
        let variant_id = self.variant_id_for(session, target.id()).await?;
        let update = VariantPriceUpdate {
            id: variant_id,
            price: item.price.to_string(),
            compare_at_price: item.compare_at_price.map(|p| p.to_string()),
        };
        let body = json!({ "variant": update });
        self.write(session, Method::PUT, &format!("variants/{variant_id}.json"), &body)
            .await?;

        info!(sku = %item.sku, variant_id, price = %item.price, "Price updated");
        Ok(())
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    pub(super) async fn write_statuses(&self, items: &[StatusUpdate]) -> BatchReport {
        let (session, resolution) = match self.begin_batch(items).await {
            Ok(started) => started,
            Err(report) => return report,
        };
        let (session, resolution) = (&*session, &resolution);

        self.inner
            .batch
            .run(
                "update_status",
                items,
                |item| item.sku.clone(),
                |item| self.write_status(session, resolution, item),
            )
            .await
    }

    async fn write_status(
        &self,
        session: &ShopifySession,
        resolution: &Resolution,
        item: &StatusUpdate,
    ) -> Result<(), MarketplaceError> {
        let target = target(item, resolution)?;
        let product_id = numeric_id("product", target.id().product_id().as_str())?;
        let body = json!({
            "product": {
                "id": product_id,
                "status": product_status_to_shopify(item.status),
            }
        });
        self.write(session, Method::PUT, &format!("products/{product_id}.json"), &body)
            .await?;

        info!(sku = %item.sku, product_id, status = %item.status, "Status updated");
        Ok(())
    }
}
