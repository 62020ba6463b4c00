use super::*;
use crate::api::test_helpers::{client_for, fail, ok, serve};
use crate::storage::MemoryStore;
use axum::extract::Query;
use axum::routing::{get, post};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

fn model(id: i64, name: &str) -> ModelConfig {
    ModelConfig { id, name: name.into(), model: "gpt-4o".into(), ..ModelConfig::default() }
}

fn list_router(list_calls: Arc<AtomicUsize>) -> axum::Router {
    axum::Router::new()
        .route(
            "/model-config/list",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let list_calls = Arc::clone(&list_calls);
                async move {
                    list_calls.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(params.get("page").map(String::as_str), Some("1"));
                    assert_eq!(params.get("page_size").map(String::as_str), Some("20"));
                    ok(json!({
                        "list": [
                            { "id": 3, "name": "main", "model": "gpt-4o" },
                            { "id": 5, "name": "backup", "model": "qwen" }
                        ],
                        "total": 2, "page": 1, "page_size": 20
                    }))
                }
            }),
        )
        .route("/model-config/create", post(|| async { ok(json!({ "id": 9, "name": "new", "model": "m" })) }))
        .route("/model-config/set-default", post(|| async { ok(json!(null)) }))
        .route("/model-config/default", get(|| async { ok(json!({ "id": 5, "name": "backup", "model": "qwen" })) }))
}

// =========================================================================
// current_or_first
// =========================================================================

#[test]
fn current_or_first_prefers_explicit_selection() {
    let store = ModelConfigStore {
        current_model_id: Some(7),
        default_model: Some(model(5, "default")),
        model_list: vec![model(3, "first")],
        ..ModelConfigStore::new()
    };
    assert_eq!(store.current_or_first(), Some(7));
}

#[test]
fn current_or_first_falls_back_to_default_then_first() {
    let mut store = ModelConfigStore {
        default_model: Some(model(5, "default")),
        model_list: vec![model(3, "first")],
        ..ModelConfigStore::new()
    };
    assert_eq!(store.current_or_first(), Some(5));

    store.default_model = None;
    assert_eq!(store.current_or_first(), Some(3));

    store.model_list.clear();
    assert_eq!(store.current_or_first(), None);
}

// =========================================================================
// persistence
// =========================================================================

#[test]
fn selection_survives_reload() {
    let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = ModelConfigStore::load(Arc::clone(&backing)).unwrap();
    assert_eq!(store.current_model_id, None);

    store.set_current(Some(12)).unwrap();

    let reloaded = ModelConfigStore::load(Arc::clone(&backing)).unwrap();
    assert_eq!(reloaded.current_model_id, Some(12));
    assert!(reloaded.model_list.is_empty());
    let raw = backing.get_item(MODEL_CONFIG_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).unwrap(), json!({ "current_model_id": 12 }));
}

#[test]
fn ephemeral_store_selects_without_persisting() {
    let mut store = ModelConfigStore::new();
    store.set_current(Some(4)).unwrap();
    assert_eq!(store.current_model_id, Some(4));
}

// =========================================================================
// fetch actions
// =========================================================================

#[tokio::test]
async fn fetch_list_fills_page() {
    let calls = Arc::new(AtomicUsize::new(0));
    let host = serve(list_router(Arc::clone(&calls))).await;
    let (client, _) = client_for(&host);
    let mut store = ModelConfigStore::new();

    store.fetch_list(&client).await.unwrap();

    assert_eq!(store.model_list.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 5]);
    assert_eq!(store.pagination, Pagination { page: 1, page_size: 20, total: 2 });
    assert!(!store.loading);
    assert_eq!(store.current_or_first(), Some(3));
}

#[tokio::test]
async fn writes_refetch_the_list() {
    let calls = Arc::new(AtomicUsize::new(0));
    let host = serve(list_router(Arc::clone(&calls))).await;
    let (client, _) = client_for(&host);
    let mut store = ModelConfigStore::new();

    let input = ModelConfigInput { name: Some("new".into()), ..ModelConfigInput::default() };
    store.create_model(&client, &input).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    store.set_default(&client, 5).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.model_list.len(), 2);
}

#[tokio::test]
async fn fetch_default_records_model() {
    let host = serve(list_router(Arc::new(AtomicUsize::new(0)))).await;
    let (client, _) = client_for(&host);
    let mut store = ModelConfigStore::new();

    store.fetch_default(&client, Some("u1")).await.unwrap();

    assert_eq!(store.default_model.as_ref().map(|m| m.id), Some(5));
    assert_eq!(store.current_or_first(), Some(5));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let router = axum::Router::new().route("/model-config/list", get(|| async { fail(500, "db down") }));
    let host = serve(router).await;
    let (client, notices) = client_for(&host);
    let mut store = ModelConfigStore { model_list: vec![model(1, "cached")], ..ModelConfigStore::new() };

    let err = store.fetch_list(&client).await.unwrap_err();

    assert!(matches!(err, ApiError::Application { code: 500, .. }));
    assert_eq!(store.model_list.len(), 1);
    assert!(!store.loading);
    assert_eq!(notices.drain().len(), 1);
}
