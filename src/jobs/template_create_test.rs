use super::*;
use crate::api::test_helpers::{client_for, fail, ok, serve};
use axum::Json;
use axum::routing::post;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn params() -> TemplateCreateParams {
    TemplateCreateParams {
        title_name: "Smart campus".into(),
        writing_requirement: "three chapters".into(),
        user_id: "u1".into(),
        ..TemplateCreateParams::default()
    }
}

// =========================================================================
// request building
// =========================================================================

#[test]
fn template_name_falls_back_to_title() {
    let request = params().to_request();
    assert_eq!(request.template_name, "Smart campus");
}

#[test]
fn template_name_falls_back_to_default() {
    let request = TemplateCreateParams { title_name: "  ".into(), ..params() }.to_request();
    assert_eq!(request.template_name, DEFAULT_TEMPLATE_NAME);
}

#[test]
fn explicit_template_name_wins() {
    let request = TemplateCreateParams { template_name: Some("Mine".into()), ..params() }.to_request();
    assert_eq!(request.template_name, "Mine");
}

#[test]
fn example_output_only_sent_when_present() {
    let without = serde_json::to_value(params().to_request()).unwrap();
    assert!(without.get("exampleOutput").is_none());

    let blank = TemplateCreateParams { example_output: Some(String::new()), ..params() };
    assert!(serde_json::to_value(blank.to_request()).unwrap().get("exampleOutput").is_none());

    let with = TemplateCreateParams { example_output: Some("1. Intro".into()), ..params() };
    let body = serde_json::to_value(with.to_request()).unwrap();
    assert_eq!(body["exampleOutput"], "1. Intro");
    assert_eq!(body["templateName"], "Smart campus");
}

// =========================================================================
// start
// =========================================================================

#[tokio::test]
async fn start_stores_template_tree() {
    let tree = json!({ "titleId": 1, "titleName": "Smart campus", "children": [] });
    let router = axum::Router::new().route(
        "/templates/createTemplateEntryTable",
        post({
            let tree = tree.clone();
            move |Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["titleName"], "Smart campus");
                ok(tree)
            }
        }),
    );
    let host = serve(router).await;
    let (client, _notices) = client_for(&host);
    let task = TemplateCreateTask::new();

    let data = task.start(&client, &params()).await.unwrap();

    assert_eq!(data, Some(tree));
    assert_eq!(task.data(), data);
    assert!(task.error().is_none());
    assert!(!task.is_running());
}

#[tokio::test]
async fn null_data_counts_as_absent() {
    let router =
        axum::Router::new().route("/templates/createTemplateEntryTable", post(|| async { ok(serde_json::Value::Null) }));
    let host = serve(router).await;
    let (client, _notices) = client_for(&host);
    let task = TemplateCreateTask::new();

    assert_eq!(task.start(&client, &params()).await.unwrap(), None);
    assert!(task.data().is_none());
    assert!(task.error().is_none());
}

#[tokio::test]
async fn start_records_error_and_rethrows() {
    let router = axum::Router::new()
        .route("/templates/createTemplateEntryTable", post(|| async { fail(500, "model quota exceeded") }));
    let host = serve(router).await;
    let (client, notices) = client_for(&host);
    let task = TemplateCreateTask::new();

    let err = task.start(&client, &params()).await.unwrap_err();

    assert!(matches!(err, ApiError::Application { code: 500, .. }));
    assert_eq!(task.error().as_deref(), Some("model quota exceeded"));
    assert!(task.data().is_none());
    assert!(!task.is_running());
    assert_eq!(notices.drain().len(), 1);
}

#[tokio::test]
async fn second_start_while_running_is_ignored() {
    let router = axum::Router::new().route(
        "/templates/createTemplateEntryTable",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            ok(json!({ "titleId": 2, "titleName": "Smart campus", "children": [] }))
        }),
    );
    let host = serve(router).await;
    let (client, _notices) = client_for(&host);
    let client = Arc::new(client);
    let task = Arc::new(TemplateCreateTask::new());

    let first = {
        let (client, task) = (Arc::clone(&client), Arc::clone(&task));
        tokio::spawn(async move { task.start(&client, &params()).await })
    };
    while !task.is_running() {
        tokio::task::yield_now().await;
    }

    let second = task.start(&client, &params()).await.unwrap();
    assert_eq!(second, None);

    let first = first.await.unwrap().unwrap();
    assert_eq!(first, Some(json!({ "titleId": 2, "titleName": "Smart campus", "children": [] })));
    assert!(!task.is_running());
}
