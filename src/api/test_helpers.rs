//! Mock backend and client builders shared by unit tests.

use std::sync::Arc;

use axum::Json;
use serde_json::{Value, json};

use super::ApiClient;
use crate::config::ClientConfig;
use crate::net::HttpClient;
use crate::net::notify::{NoticeQueue, Notifier};
use crate::session::SessionContext;

/// Serve `router` under `/api` on an ephemeral local port and return
/// the host URL.
pub async fn serve(router: axum::Router) -> String {
    let router = axum::Router::new().nest("/api", router);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend");
    });
    format!("http://{addr}")
}

/// Client with an in-memory session pointed at `host`, plus the queue
/// its notices land in.
#[must_use]
pub fn client_for(host: &str) -> (ApiClient, Arc<NoticeQueue>) {
    let config = ClientConfig { api_host: host.to_owned(), ..ClientConfig::default() };
    let notices = Arc::new(NoticeQueue::new());
    let http = HttpClient::new(&config, Arc::clone(&notices) as Arc<dyn Notifier>).expect("http client");
    (ApiClient::new(http, SessionContext::ephemeral()), notices)
}

/// Success envelope around `data`.
#[must_use]
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "code": 200, "type": "success", "message": "ok", "data": data }))
}

/// Application-level failure envelope.
#[must_use]
pub fn fail(code: i64, message: &str) -> Json<Value> {
    Json(json!({ "code": code, "type": "error", "message": message, "data": null }))
}
