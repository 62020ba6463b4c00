use super::*;
use crate::net::notify::NoticeQueue;

// =============================================================
// requires_auth allow-list
// =============================================================

#[test]
fn public_paths_skip_auth() {
    assert!(!requires_auth("/login"));
    assert!(!requires_auth("/register"));
    assert!(!requires_auth("/register-with-invite"));
    assert!(!requires_auth("/login?next=/history"));
}

#[test]
fn lookalike_paths_still_require_auth() {
    assert!(requires_auth("/register-admin"));
    assert!(requires_auth("/checkToken"));
    assert!(requires_auth("/file/queryFileList"));
    assert!(requires_auth("/admin/users"));
}

// =============================================================
// ApiRequest builder
// =============================================================

#[test]
fn query_opt_skips_missing_values() {
    let req = ApiRequest::get("/model-config/default")
        .query_opt("user_id", None::<&str>)
        .query_opt("name", Some("gpt"));
    assert_eq!(req.query, vec![("name".to_owned(), "gpt".to_owned())]);
}

#[test]
fn json_body_is_serialized_eagerly() {
    let req = ApiRequest::post("/login")
        .json(&serde_json::json!({"username": "ann"}))
        .expect("json body");
    assert!(matches!(req.body, RequestBody::Json(ref v) if v["username"] == "ann"));
    assert_eq!(req.method, Method::POST);
    assert!(!req.quiet);
    assert!(ApiRequest::get("/x").quiet().quiet);
}

// =============================================================
// HttpClient construction
// =============================================================

#[test]
fn new_rejects_non_http_base() {
    let config = ClientConfig { api_host: "ftp://files.example.test".to_owned(), ..ClientConfig::default() };
    let result = HttpClient::new(&config, Arc::new(NoticeQueue::new()));
    assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
}

#[test]
fn url_joins_path_onto_api_base() {
    let config = ClientConfig { api_host: "http://127.0.0.1:29847/".to_owned(), ..ClientConfig::default() };
    let client = HttpClient::new(&config, Arc::new(NoticeQueue::new())).expect("client");
    assert_eq!(client.base_url(), "http://127.0.0.1:29847/api");
    assert_eq!(client.url("/solution/generate-article"), "http://127.0.0.1:29847/api/solution/generate-article");
}

#[tokio::test]
async fn unreachable_host_reports_network_notice() {
    let notices = Arc::new(NoticeQueue::new());
    // Port 9 (discard) on localhost is closed in test environments.
    let config = ClientConfig {
        api_host: "http://127.0.0.1:9".to_owned(),
        timeouts: crate::config::Timeouts { request_secs: 2, connect_secs: 1 },
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&config, notices.clone()).expect("client");
    let err = client.execute(ApiRequest::get("/public-configs"), None).await.expect_err("network error");
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(notices.drain(), vec![(NoticeLevel::Error, NETWORK_ERROR_NOTICE.to_owned())]);
}

#[tokio::test]
async fn quiet_request_does_not_notify() {
    let notices = Arc::new(NoticeQueue::new());
    let config = ClientConfig {
        api_host: "http://127.0.0.1:9".to_owned(),
        timeouts: crate::config::Timeouts { request_secs: 2, connect_secs: 1 },
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&config, notices.clone()).expect("client");
    let result = client.execute(ApiRequest::get("/public-configs").quiet(), None).await;
    assert!(result.is_err());
    assert!(notices.drain().is_empty());
}
