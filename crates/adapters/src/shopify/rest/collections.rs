//! Custom collections: categories and collection membership.

use async_trait::async_trait;
use marketsync_core::{
    Category, CategoryAttribute, CollectionManagement, CompositeProductId, OperationResult,
};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::shopify::ShopifyError;
use crate::shopify::types::{CollectsEnvelope, CustomCollectionEnvelope, CustomCollectionsEnvelope};

use super::conversions::{convert_collection, product_attribute_schema};
use super::{MAX_PAGE_SIZE, ShopifyAdapter, cursor_query, numeric_id};

impl ShopifyAdapter {
    /// Every custom collection. Collections are flat, so asking for the
    /// children of a parent yields nothing.
    #[instrument(skip(self))]
    pub(super) async fn categories(
        &self,
        parent_id: Option<&str>,
    ) -> Result<Vec<Category>, ShopifyError> {
        let session = self.session().await?;
        if let Some(parent_id) = parent_id {
            debug!(parent_id, "Custom collections have no children");
            return Ok(Vec::new());
        }

        let mut categories = Vec::new();
        let mut query = vec![("limit", MAX_PAGE_SIZE.to_string())];
        loop {
            let (envelope, next_cursor) = self
                .get_page::<CustomCollectionsEnvelope>(&session, "custom_collections.json", &query)
                .await?;
            categories.extend(envelope.custom_collections.iter().map(convert_collection));

            match next_cursor {
                Some(cursor) => query = cursor_query(MAX_PAGE_SIZE, &cursor),
                None => break,
            }
        }
        Ok(categories)
    }

    /// Attribute schema for a collection, after checking it exists.
    #[instrument(skip(self))]
    pub(super) async fn category_attributes(
        &self,
        category_id: &str,
    ) -> Result<Vec<CategoryAttribute>, ShopifyError> {
        let session = self.session().await?;
        let collection_id = numeric_id("collection", category_id)?;
        self.get_json::<CustomCollectionEnvelope>(
            &session,
            &format!("custom_collections/{collection_id}.json"),
            &[],
        )
        .await?;
        Ok(product_attribute_schema())
    }

    #[instrument(skip(self), fields(product_id = %product))]
    async fn add_collect(
        &self,
        collection_id: &str,
        product: &CompositeProductId,
    ) -> Result<(), ShopifyError> {
        let session = self.session().await?;
        let collection_id = numeric_id("collection", collection_id)?;
        let product_id = numeric_id("product", product.product_id().as_str())?;

        let body = json!({
            "collect": {
                "product_id": product_id,
                "collection_id": collection_id,
            }
        });
        self.write(&session, Method::POST, "collects.json", &body).await?;

        info!(collection_id, product_id, "Product added to collection");
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product))]
    async fn remove_collect(
        &self,
        collection_id: &str,
        product: &CompositeProductId,
    ) -> Result<(), ShopifyError> {
        let session = self.session().await?;
        let collection_id = numeric_id("collection", collection_id)?;
        let product_id = numeric_id("product", product.product_id().as_str())?;

        let query = vec![
            ("collection_id", collection_id.to_string()),
            ("product_id", product_id.to_string()),
        ];
        let collect = self
            .get_json::<CollectsEnvelope>(&session, "collects.json", &query)
            .await?
            .collects
            .into_iter()
            .next()
            .ok_or_else(|| {
                ShopifyError::NotFound(format!(
                    "product {product_id} in collection {collection_id}"
                ))
            })?;

        self.send(
            &session,
            Method::DELETE,
            &format!("collects/{}.json", collect.id),
            &[],
            None,
        )
        .await?;

        info!(collection_id, product_id, "Product removed from collection");
        Ok(())
    }
}

#[async_trait]
impl CollectionManagement for ShopifyAdapter {
    async fn add_product_to_collection(
        &self,
        collection_id: &str,
        product_id: &CompositeProductId,
    ) -> OperationResult<()> {
        Ok(self.add_collect(collection_id, product_id).await?)
    }

    async fn remove_product_from_collection(
        &self,
        collection_id: &str,
        product_id: &CompositeProductId,
    ) -> OperationResult<()> {
        Ok(self.remove_collect(collection_id, product_id).await?)
    }
}
