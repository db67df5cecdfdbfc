//! Product, stock, price and category commands.

use marketsync_adapters::ShopifyAdapter;
use marketsync_core::{
    MarketplaceAdapter, PageRequest, PriceUpdate, ProductFilters, ProductStatus, StatusUpdate,
    StockUpdate,
};

use super::{finish_batch, print_json};

/// Print one product, looked up by SKU or by id.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn product(
    adapter: &ShopifyAdapter,
    sku: Option<&str>,
    id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = match (sku, id) {
        (Some(sku), _) => adapter.get_product_by_sku(sku).await?,
        (None, Some(id)) => adapter.get_product_by_id(id).await?,
        (None, None) => return Err("either --sku or --id is required".into()),
    };
    print_json(&product)
}

/// Print one page of products.
///
/// # Errors
///
/// Returns an error if the listing request fails.
pub async fn products(
    adapter: &ShopifyAdapter,
    page: u32,
    page_size: u32,
    status: Option<ProductStatus>,
    cursor: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = PageRequest::new(page, page_size);
    if let Some(cursor) = cursor {
        request = request.with_cursor(cursor);
    }
    let filters = ProductFilters {
        status,
        ..ProductFilters::default()
    };

    let page = adapter.get_products(request, filters).await?;
    print_json(&page)
}

pub async fn set_stock(
    adapter: &ShopifyAdapter,
    items: &[StockUpdate],
) -> Result<(), Box<dyn std::error::Error>> {
    finish_batch(&adapter.update_stock(items).await)
}

pub async fn set_price(
    adapter: &ShopifyAdapter,
    items: &[PriceUpdate],
) -> Result<(), Box<dyn std::error::Error>> {
    finish_batch(&adapter.update_prices(items).await)
}

pub async fn set_status(
    adapter: &ShopifyAdapter,
    items: &[StatusUpdate],
) -> Result<(), Box<dyn std::error::Error>> {
    finish_batch(&adapter.update_status(items).await)
}

/// Print top-level categories.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn categories(adapter: &ShopifyAdapter) -> Result<(), Box<dyn std::error::Error>> {
    let categories = adapter.get_categories(None).await?;
    print_json(&categories)
}
