//! Product lookups, listings and price/status batch writes.

use marketsync_core::{
    CompositeProductId, ErrorCode, MarketplaceAdapter, MarketplaceError, PageRequest, PriceUpdate,
    ProductFilters, ProductStatus, StatusUpdate,
};
use marketsync_integration_tests::{MockStore, fixtures};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

async fn mount_catalog(store: &MockStore) {
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::catalog()))
        .mount(store.server())
        .await;
}

async fn mount_count(store: &MockStore, count: u64) {
    Mock::given(method("GET"))
        .and(path(store.api_path("products/count.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::count(count)))
        .mount(store.server())
        .await;
}

#[tokio::test]
async fn test_get_product_by_sku() {
    let store = MockStore::start().await;
    mount_catalog(&store).await;
    let adapter = store.connected_adapter().await;

    let product = adapter.get_product_by_sku("TEE-M").await.expect("found");
    assert_eq!(product.id.to_string(), "632910392-808950811");
    assert_eq!(product.sku, "TEE-M");
    assert_eq!(product.price, Decimal::new(2500, 2));
    assert_eq!(product.currency, fixtures::SHOP_CURRENCY);
    assert_eq!(product.status, ProductStatus::Active);
    assert_eq!(product.platform.inventory_item_id.as_deref(), Some("808951811"));

    let err = adapter.get_product_by_sku("NOPE").await.expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_get_products_by_skus_returns_only_matches() {
    let store = MockStore::start().await;
    mount_catalog(&store).await;
    let adapter = store.connected_adapter().await;

    let skus = vec!["TEE-S".to_string(), "MISSING".to_string(), "MUG-1".to_string()];
    let products = adapter.get_products_by_skus(&skus).await.expect("scan");

    let found: Vec<&str> = products.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(found, vec!["TEE-S", "MUG-1"]);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let store = MockStore::start().await;
    let catalog = fixtures::catalog();
    Mock::given(method("GET"))
        .and(path(store.api_path("products/632910392.json")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "product": catalog["products"][0] })),
        )
        .mount(store.server())
        .await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products/1.json")))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"errors":"Not Found"}"#))
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let variant = adapter
        .get_product_by_id("632910392-808950811")
        .await
        .expect("composite id");
    assert_eq!(variant.sku, "TEE-M");

    let first = adapter.get_product_by_id("632910392").await.expect("bare id");
    assert_eq!(first.sku, "TEE-S");

    let err = adapter.get_product_by_id("1").await.expect_err("404");
    assert!(matches!(err, MarketplaceError::NotFound(_)));

    let err = adapter
        .get_product_by_id("632910392-999")
        .await
        .expect_err("unknown variant");
    assert!(matches!(err, MarketplaceError::NotFound(_)));

    let err = adapter.get_product_by_id("tee").await.expect_err("non-numeric");
    assert_eq!(err.code(), ErrorCode::Validation);
}

#[tokio::test]
async fn test_first_page_carries_next_cursor() {
    let store = MockStore::start().await;
    mount_count(&store, 3).await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .and(query_param("limit", "2"))
        .and(query_param("status", "active"))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::catalog())
                .insert_header("Link", store.next_link("products.json", "eyJsYXN0X2lkIjo5MjE3Mjg3MzZ9").as_str()),
        )
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let filters = ProductFilters {
        status: Some(ProductStatus::Active),
        ..ProductFilters::default()
    };
    let page = adapter
        .get_products(PageRequest::new(1, 2), filters)
        .await
        .expect("page");

    // one item per variant
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert!(page.meta.has_next);
    assert!(!page.meta.has_prev);
    assert_eq!(page.meta.cursor.as_deref(), Some("eyJsYXN0X2lkIjo5MjE3Mjg3MzZ9"));
}

#[tokio::test]
async fn test_cursor_request_drops_filters() {
    let store = MockStore::start().await;
    mount_count(&store, 3).await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .and(query_param("page_info", "abc"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::products(vec![fixtures::product(
                921_728_736,
                "Enamel Mug",
                vec![fixtures::variant(447_654_529, "MUG-1", "12.50")],
            )])),
        )
        .expect(1)
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let filters = ProductFilters {
        status: Some(ProductStatus::Active),
        ..ProductFilters::default()
    };
    let page = adapter
        .get_products(PageRequest::new(2, 2).with_cursor("abc"), filters)
        .await
        .expect("page");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.meta.page, 2);
    assert!(page.meta.cursor.is_none());
    assert!(page.meta.has_prev);
}

#[tokio::test]
async fn test_page_number_walks_cursors() {
    let store = MockStore::start().await;
    mount_count(&store, 3).await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .and(query_param_is_missing("page_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::catalog())
                .insert_header("Link", store.next_link("products.json", "page2").as_str()),
        )
        .expect(2)
        .mount(store.server())
        .await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .and(query_param("page_info", "page2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::products(vec![fixtures::product(
                1_111,
                "Canvas Bag",
                vec![fixtures::variant(2_222, "BAG-1", "18.00")],
            )])),
        )
        .expect(2)
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let second = adapter
        .get_products(PageRequest::new(2, 2), ProductFilters::default())
        .await
        .expect("page 2");
    let skus: Vec<&str> = second.items.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["BAG-1"]);

    // past the last page
    let third = adapter
        .get_products(PageRequest::new(3, 2), ProductFilters::default())
        .await
        .expect("page 3");
    assert!(third.items.is_empty());
    assert_eq!(third.meta.page, 3);
    assert!(!third.meta.has_next);
}

#[tokio::test]
async fn test_update_prices_reports_each_item() {
    let store = MockStore::start().await;
    mount_catalog(&store).await;
    Mock::given(method("PUT"))
        .and(path(store.api_path("variants/808950810.json")))
        .and(body_partial_json(json!({
            "variant": { "id": 808_950_810, "price": "30.00", "compare_at_price": "35.00" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 808_950_810 } })))
        .expect(1)
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let items = vec![
        PriceUpdate {
            compare_at_price: Some(Decimal::new(3500, 2)),
            ..PriceUpdate::new("TEE-S", Decimal::new(3000, 2))
        },
        PriceUpdate::new("MISSING", Decimal::new(100, 2)),
        PriceUpdate::new("MUG-1", Decimal::new(-100, 2)),
    ];
    let report = adapter.update_prices(&items).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.successful, vec!["TEE-S"]);
    assert_eq!(report.failure_reason("MISSING"), Some("Not found: SKU MISSING"));
    assert!(
        report
            .failure_reason("MUG-1")
            .is_some_and(|r| r.starts_with("Validation error"))
    );
}

#[tokio::test]
async fn test_update_prices_with_known_id_skips_scan() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::catalog()))
        .expect(0)
        .mount(store.server())
        .await;
    Mock::given(method("PUT"))
        .and(path(store.api_path("variants/447654529.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "variant": { "id": 447_654_529 } })))
        .expect(1)
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let id: CompositeProductId = "921728736-447654529".parse().expect("valid id");
    let report = adapter
        .update_prices(&[PriceUpdate {
            product_id: Some(id),
            ..PriceUpdate::new("MUG-1", Decimal::new(1400, 2))
        }])
        .await;
    assert!(report.is_success());
}

#[tokio::test]
async fn test_update_status_maps_to_shopify_status() {
    let store = MockStore::start().await;
    mount_catalog(&store).await;
    Mock::given(method("PUT"))
        .and(path(store.api_path("products/921728736.json")))
        .and(body_partial_json(json!({
            "product": { "id": 921_728_736, "status": "archived" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "product": { "id": 921_728_736 } })))
        .expect(1)
        .mount(store.server())
        .await;
    Mock::given(method("PUT"))
        .and(path(store.api_path("products/632910392.json")))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_string(r#"{"errors":{"status":["is not included in the list"]}}"#),
        )
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let report = adapter
        .update_status(&[
            StatusUpdate::new("MUG-1", ProductStatus::Inactive),
            StatusUpdate::new("TEE-S", ProductStatus::Draft),
        ])
        .await;

    assert_eq!(report.successful, vec!["MUG-1"]);
    assert!(
        report
            .failure_reason("TEE-S")
            .is_some_and(|r| r.contains("is not included in the list"))
    );
}

#[tokio::test]
async fn test_failed_scan_fails_every_unresolved_item() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(store.api_path("products.json")))
        .respond_with(ResponseTemplate::new(503))
        .mount(store.server())
        .await;
    let adapter = store.connected_adapter().await;

    let report = adapter
        .update_status(&[
            StatusUpdate::new("TEE-S", ProductStatus::Active),
            StatusUpdate::new("MUG-1", ProductStatus::Active),
        ])
        .await;

    assert!(report.successful.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert!(
        report
            .failed
            .iter()
            .all(|f| f.reason.starts_with("Transport error"))
    );
}
