//! Catalog Store refreshes against a live local endpoint.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use imarket_core::{LoadStatus, Price, ProductId};
use imarket_integration_tests::{MockCatalog, catalog_json, product_json};
use imarket_storefront::config::CatalogConfig;
use imarket_storefront::{CatalogClient, CatalogError, CatalogStore, RefreshOutcome};

fn two_products() -> serde_json::Value {
    catalog_json(vec![
        product_json(1, "Essence Mascara Lash Princess", 9.99, "beauty"),
        product_json(2, "Eyeshadow Palette with Mirror", 19.99, "beauty"),
    ])
}

// =============================================================================
// Successful loads
// =============================================================================

#[tokio::test]
async fn test_refresh_loads_products_in_endpoint_order() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    let store = mock.store();

    let outcome = store.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Completed(LoadStatus::Loaded));

    let state = store.snapshot();
    assert!(!state.is_loading());
    assert!(state.error_message().is_none());
    assert!(state.last_loaded_at().is_some());

    let ids: Vec<i64> = state.products().iter().map(|p| p.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(state.products()[0].price, Price::from_cents(999));
    assert_eq!(state.products()[1].price.to_string(), "$19.99");
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_empty_catalog_is_a_success() {
    let mock = MockCatalog::start().await.unwrap();
    let store = mock.store();

    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed(LoadStatus::Loaded)
    );
    assert!(store.products().is_empty());
    assert!(store.snapshot().error_message().is_none());
}

#[tokio::test]
async fn test_second_refresh_replaces_products() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    let store = mock.store();
    store.refresh().await;

    mock.respond_json(&catalog_json(vec![product_json(
        9,
        "Wooden Bathroom Sink",
        799.0,
        "furniture",
    )]));
    store.refresh().await;

    let products = store.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, ProductId::new(9));
    assert!(store.find(ProductId::new(1)).is_none());
    assert_eq!(mock.hits(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_keeps_stale_products() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    let store = mock.store();
    store.refresh().await;
    let loaded_at = store.snapshot().last_loaded_at();

    mock.respond(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
    let outcome = store.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Completed(LoadStatus::Failed));

    let state = store.snapshot();
    assert!(!state.is_loading());
    assert_eq!(state.products().len(), 2);
    assert_eq!(state.last_loaded_at(), loaded_at);
    let message = state.error_message().unwrap();
    assert!(message.contains("500"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_undecodable_body_sets_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond(StatusCode::OK, "<html>maintenance</html>");
    let store = mock.store();

    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed(LoadStatus::Failed)
    );
    let state = store.snapshot();
    assert!(state.products().is_empty());
    assert!(!state.error_message().unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_price_is_a_decode_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&catalog_json(vec![product_json(
        1,
        "Refund Voucher",
        -5.0,
        "misc",
    )]));
    let client = CatalogClient::new(&mock.config()).unwrap();

    let error = client.fetch_products().await.unwrap_err();
    assert!(matches!(error, CatalogError::Decode(_)));
    assert_eq!(error.kind(), "decode");
}

#[tokio::test]
async fn test_missing_envelope_field_is_a_decode_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&serde_json::json!({ "products": [] }));
    let client = CatalogClient::new(&mock.config()).unwrap();

    let error = client.fetch_products().await.unwrap_err();
    assert!(matches!(error, CatalogError::Decode(_)));
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.set_delay(Duration::from_secs(2));
    let config = CatalogConfig {
        endpoint: mock.url(),
        request_timeout: Duration::from_millis(200),
    };
    let store = CatalogStore::new(CatalogClient::new(&config).unwrap());

    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed(LoadStatus::Failed)
    );
    assert!(
        store
            .snapshot()
            .error_message()
            .unwrap()
            .starts_with("Network error")
    );
}

#[tokio::test]
async fn test_recovery_after_failure_clears_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond(StatusCode::SERVICE_UNAVAILABLE, "");
    let store = mock.store();
    store.refresh().await;
    assert!(store.snapshot().error_message().is_some());

    mock.respond_json(&two_products());
    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed(LoadStatus::Loaded)
    );
    assert!(store.snapshot().error_message().is_none());
    assert_eq!(store.products().len(), 2);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_overlapping_refreshes_are_coalesced() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(300));
    let store = mock.store();

    let (first, second) = tokio::join!(store.refresh(), store.refresh());

    assert_eq!(first, RefreshOutcome::Completed(LoadStatus::Loaded));
    assert_eq!(second, RefreshOutcome::AlreadyInFlight);
    assert_eq!(mock.hits(), 1);
    assert_eq!(store.products().len(), 2);
}

#[tokio::test]
async fn test_subscriber_sees_loading_then_loaded() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(200));
    let store = Arc::new(mock.store());
    let mut rx = store.subscribe();

    let handle = store.spawn_refresh();
    // spawn_refresh enters Loading before returning.
    assert!(rx.borrow_and_update().is_loading());

    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.status(), LoadStatus::Loaded);
    assert_eq!(state.products().len(), 2);

    assert_eq!(
        handle.await.unwrap(),
        RefreshOutcome::Completed(LoadStatus::Loaded)
    );
}

#[tokio::test]
async fn test_spawned_refresh_is_discarded_when_store_dropped() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(200));
    let store = Arc::new(mock.store());

    let handle = store.spawn_refresh();
    drop(store);

    assert_eq!(handle.await.unwrap(), RefreshOutcome::Discarded);
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_spawn_refresh_while_in_flight_is_coalesced() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(200));
    let store = Arc::new(mock.store());

    let first = store.spawn_refresh();
    let second = store.spawn_refresh();

    assert_eq!(second.await.unwrap(), RefreshOutcome::AlreadyInFlight);
    assert_eq!(
        first.await.unwrap(),
        RefreshOutcome::Completed(LoadStatus::Loaded)
    );
    assert_eq!(mock.hits(), 1);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_aborted_spawn_refresh_does_not_block_later_refreshes() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(300));
    let store = Arc::new(mock.store());

    let handle = store.spawn_refresh();
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
    assert_eq!(store.snapshot().status(), LoadStatus::Idle);

    mock.set_delay(Duration::ZERO);
    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed(LoadStatus::Loaded)
    );
    assert_eq!(store.products().len(), 2);
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_cancelled_refresh_after_failure_keeps_error() {
    let mock = MockCatalog::start().await.unwrap();
    mock.respond(StatusCode::INTERNAL_SERVER_ERROR, "down");
    let store = mock.store();
    store.refresh().await;
    let message = store.snapshot().error_message().unwrap().to_string();

    mock.respond_json(&two_products());
    mock.set_delay(Duration::from_millis(300));
    let cancelled = tokio::time::timeout(Duration::from_millis(50), store.refresh()).await;
    assert!(cancelled.is_err());

    let state = store.snapshot();
    assert_eq!(state.status(), LoadStatus::Failed);
    assert_eq!(state.error_message(), Some(message.as_str()));
}
