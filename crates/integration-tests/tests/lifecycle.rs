//! Initialize, connection checks and close against a mock store.

use marketsync_core::{Credentials, ErrorCode, MarketplaceAdapter, MarketplaceError};
use marketsync_integration_tests::{ACCESS_TOKEN, MockStore, fixtures};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_initialize_probes_shop_with_access_token() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(store.api_path("shop.json")))
        .and(header("X-Shopify-Access-Token", ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::shop()))
        .expect(2)
        .mount(store.server())
        .await;

    let adapter = store.adapter();
    adapter
        .initialize(store.credentials())
        .await
        .expect("initialize");
    assert!(adapter.is_initialized().await);

    let status = adapter.test_connection().await;
    assert!(status.connected);
    assert_eq!(status.message, "Connected to Marketsync Test");
}

#[tokio::test]
async fn test_invalid_credentials_fail_initialize() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(store.api_path("shop.json")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"errors":"[API] Invalid API key or access token"}"#),
        )
        // authentication failures are not retried
        .expect(1)
        .mount(store.server())
        .await;

    let adapter = store.adapter();
    let err = adapter
        .initialize(Credentials::new("marketsync-test.myshopify.com", "shpat_revoked"))
        .await
        .expect_err("401 probe");
    assert_eq!(err.code(), ErrorCode::Initialization);
    assert!(err.to_string().contains("connectivity probe failed"));

    assert!(!adapter.is_initialized().await);
    let status = adapter.test_connection().await;
    assert!(!status.connected);
    assert_eq!(status.message, "Adapter not initialized");
}

#[tokio::test]
async fn test_connection_reports_revoked_token() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(store.api_path("shop.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::shop()))
        .up_to_n_times(1)
        .mount(store.server())
        .await;
    Mock::given(method("GET"))
        .and(path(store.api_path("shop.json")))
        .respond_with(ResponseTemplate::new(401))
        .mount(store.server())
        .await;

    let adapter = store.adapter();
    adapter
        .initialize(store.credentials())
        .await
        .expect("initialize");

    let status = adapter.test_connection().await;
    assert!(!status.connected);
    assert!(status.message.contains("Invalid or expired access token"));
}

#[tokio::test]
async fn test_missing_credentials_never_reach_the_store() {
    let store = MockStore::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(store.server())
        .await;

    let err = store
        .adapter()
        .initialize(Credentials::new("", ACCESS_TOKEN))
        .await
        .expect_err("missing store");
    assert_eq!(err.code(), ErrorCode::Initialization);
}

#[tokio::test]
async fn test_close_clears_session() {
    let store = MockStore::start().await;
    let adapter = store.connected_adapter().await;

    adapter.close().await;
    assert!(!adapter.is_initialized().await);
    assert_eq!(
        adapter.get_order_by_id("450789469").await,
        Err(MarketplaceError::NotInitialized)
    );

    // idempotent
    adapter.close().await;
}

#[tokio::test]
async fn test_operations_before_initialize() {
    let store = MockStore::start().await;
    let adapter = store.adapter();

    assert_eq!(
        adapter.get_products_by_skus(&["TEE-S".to_string()]).await,
        Err(MarketplaceError::NotInitialized)
    );
    assert_eq!(
        adapter.acknowledge_order("450789469").await,
        Err(MarketplaceError::NotInitialized)
    );
    assert_eq!(
        adapter.get_categories(None).await,
        Err(MarketplaceError::NotInitialized)
    );

    let report = adapter
        .update_prices(&[marketsync_core::PriceUpdate::new(
            "TEE-S",
            rust_decimal::Decimal::new(2000, 2),
        )])
        .await;
    assert_eq!(report.total(), 1);
    assert_eq!(report.failure_reason("TEE-S"), Some("Adapter not initialized"));
}
