//! Product conversion functions.

use marketsync_core::{CanonicalProduct, CompositeProductId, PlatformFields, ProductStatus};

use crate::shopify::types::{ShopifyImage, ShopifyProduct, ShopifyVariant, split_tags};

use super::parse_amount;

/// Variant title Shopify gives single-variant products.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Convert one variant of a product into a canonical product.
pub fn convert_variant(
    product: &ShopifyProduct,
    variant: &ShopifyVariant,
    currency: &str,
) -> CanonicalProduct {
    let compare_at_price = variant
        .compare_at_price
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(|p| parse_amount(Some(p), "compare_at_price"));

    CanonicalProduct {
        id: CompositeProductId::new(product.id.to_string().into(), variant.id.to_string().into()),
        sku: variant.sku.clone().unwrap_or_default(),
        title: variant_title(&product.title, variant.title.as_deref()),
        description: product.body_html.clone().unwrap_or_default(),
        price: parse_amount(variant.price.as_deref(), "price"),
        currency: currency.to_string(),
        stock: variant.inventory_quantity.unwrap_or(0),
        status: product_status_from_shopify(product.status.as_deref()),
        image_urls: image_urls(product, variant),
        created_at: product.created_at,
        updated_at: product.updated_at,
        platform: PlatformFields {
            vendor: product.vendor.clone(),
            product_type: product.product_type.clone().filter(|t| !t.is_empty()),
            tags: split_tags(product.tags.as_deref()),
            weight: variant.weight,
            weight_unit: variant.weight_unit.clone(),
            barcode: variant.barcode.clone().filter(|b| !b.is_empty()),
            compare_at_price,
            inventory_item_id: variant.inventory_item_id.map(|id| id.to_string()),
        },
    }
}

/// Product title, suffixed with the variant title when it is meaningful.
pub fn variant_title(product_title: &str, variant_title: Option<&str>) -> String {
    match variant_title.map(str::trim) {
        Some(title) if !title.is_empty() && title != DEFAULT_VARIANT_TITLE => {
            format!("{product_title} - {title}")
        }
        _ => product_title.to_string(),
    }
}

/// Map a Shopify product status; unknown values become `Draft`.
pub fn product_status_from_shopify(status: Option<&str>) -> ProductStatus {
    match status {
        Some("active") => ProductStatus::Active,
        Some("archived") => ProductStatus::Inactive,
        _ => ProductStatus::Draft,
    }
}

/// Shopify status value for a canonical status.
pub const fn product_status_to_shopify(status: ProductStatus) -> &'static str {
    match status {
        ProductStatus::Active => "active",
        ProductStatus::Inactive => "archived",
        ProductStatus::Draft => "draft",
    }
}

/// Image URLs with the variant's own image first.
fn image_urls(product: &ShopifyProduct, variant: &ShopifyVariant) -> Vec<String> {
    let is_variant_image = |image: &&ShopifyImage| {
        variant.image_id == Some(image.id) || image.variant_ids.contains(&variant.id)
    };

    product
        .images
        .iter()
        .filter(is_variant_image)
        .chain(product.images.iter().filter(|i| !is_variant_image(i)))
        .map(|image| image.src.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> ShopifyProduct {
        serde_json::from_value(serde_json::json!({
            "id": 632_910_392,
            "title": "IPod Nano - 8GB",
            "body_html": "<p>It's the small iPod</p>",
            "vendor": "Apple",
            "product_type": "Cult Products",
            "status": "active",
            "tags": "Emotive, Flash Memory",
            "variants": [
                {
                    "id": 808_950_810,
                    "title": "Pink",
                    "sku": "IPOD2008PINK",
                    "price": "199.00",
                    "compare_at_price": "249.00",
                    "inventory_quantity": 10,
                    "inventory_item_id": 808_950_810,
                    "weight": 0.2,
                    "weight_unit": "kg",
                    "barcode": "1234_pink"
                },
                {
                    "id": 49_148_385,
                    "title": "Default Title",
                    "sku": "IPOD2008RED",
                    "price": "bogus"
                }
            ],
            "images": [
                {"id": 1, "src": "https://cdn.example.com/front.jpg", "variant_ids": []},
                {"id": 2, "src": "https://cdn.example.com/pink.jpg", "variant_ids": [808_950_810]}
            ]
        }))
        .expect("valid product")
    }

    #[test]
    fn test_convert_variant() {
        let product = product();
        let variant = product.variants.first().expect("variant");
        let canonical = convert_variant(&product, variant, "USD");

        assert_eq!(canonical.id.to_string(), "632910392-808950810");
        assert_eq!(canonical.sku, "IPOD2008PINK");
        assert_eq!(canonical.title, "IPod Nano - 8GB - Pink");
        assert_eq!(canonical.price, Decimal::new(19900, 2));
        assert_eq!(canonical.currency, "USD");
        assert_eq!(canonical.stock, 10);
        assert_eq!(canonical.status, ProductStatus::Active);
        assert_eq!(
            canonical.image_urls,
            vec![
                "https://cdn.example.com/pink.jpg".to_string(),
                "https://cdn.example.com/front.jpg".to_string()
            ]
        );
        assert_eq!(canonical.platform.tags, vec!["Emotive", "Flash Memory"]);
        assert_eq!(canonical.platform.compare_at_price, Some(Decimal::new(24900, 2)));
        assert_eq!(canonical.platform.inventory_item_id.as_deref(), Some("808950810"));
    }

    #[test]
    fn test_default_variant_title_and_bad_price() {
        let product = product();
        let variant = product.variants.get(1).expect("variant");
        let canonical = convert_variant(&product, variant, "USD");

        assert_eq!(canonical.title, "IPod Nano - 8GB");
        assert_eq!(canonical.price, Decimal::ZERO);
        assert_eq!(canonical.stock, 0);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(product_status_from_shopify(Some("active")), ProductStatus::Active);
        assert_eq!(product_status_from_shopify(Some("archived")), ProductStatus::Inactive);
        assert_eq!(product_status_from_shopify(Some("draft")), ProductStatus::Draft);
        assert_eq!(product_status_from_shopify(Some("unlisted")), ProductStatus::Draft);
        assert_eq!(product_status_from_shopify(None), ProductStatus::Draft);

        for status in [ProductStatus::Active, ProductStatus::Inactive, ProductStatus::Draft] {
            assert_eq!(
                product_status_from_shopify(Some(product_status_to_shopify(status))),
                status
            );
        }
    }

    #[test]
    fn test_images_without_variant_match_keep_order() {
        let mut product = product();
        product.images = vec![
            ShopifyImage {
                id: 7,
                src: "a".to_string(),
                variant_ids: vec![],
            },
            ShopifyImage {
                id: 8,
                src: "b".to_string(),
                variant_ids: vec![],
            },
        ];
        let variant = product.variants.get(1).expect("variant");
        assert_eq!(image_urls(&product, variant), vec!["a", "b"]);
    }
}
