use super::*;
use crate::api::test_helpers::{client_for, ok, serve};
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;

#[test]
fn usage_doc_url_defaults_to_empty() {
    let mut store = SystemStore::new();
    assert_eq!(store.usage_doc_url(), "");

    store.configs.insert(USAGE_DOC_URL_KEY.into(), json!(42));
    assert_eq!(store.usage_doc_url(), "");
}

#[tokio::test]
async fn fetch_stores_configs() {
    let router = axum::Router::new().route(
        "/public-configs",
        get(|| async { ok(json!({ "usage_doc_url": "https://docs.example.com/guide", "site": "x" })) }),
    );
    let host = serve(router).await;
    let (client, _) = client_for(&host);
    let mut store = SystemStore::new();

    store.fetch_public_configs(&client).await;

    assert_eq!(store.usage_doc_url(), "https://docs.example.com/guide");
    assert_eq!(store.configs.len(), 2);
}

#[tokio::test]
async fn fetch_failure_keeps_previous_configs() {
    let router = axum::Router::new().route(
        "/public-configs",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, axum::Json(json!({ "detail": "maintenance" }))) }),
    );
    let host = serve(router).await;
    let (client, _) = client_for(&host);
    let mut store = SystemStore::new();
    store.configs.insert(USAGE_DOC_URL_KEY.into(), json!("https://old"));

    store.fetch_public_configs(&client).await;

    assert_eq!(store.usage_doc_url(), "https://old");
}
