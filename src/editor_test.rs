use super::*;
use crate::api::test_helpers::{client_for, fail, ok, serve};
use axum::routing::get;

fn server_config(provider: Value, defaults: Option<PanelDefaults>) -> ServerEditorConfig {
    let providers = json!({ "proxy": provider });
    let models = json!({
        "gpt-4o": { "provider": "proxy" },
        "qwen-max": { "provider": "proxy" }
    });
    ServerEditorConfig {
        providers: providers.as_object().cloned(),
        models: models.as_object().cloned(),
        defaults,
    }
}

// =========================================================================
// endpoint helpers
// =========================================================================

#[test]
fn strip_version_suffix_removes_trailing_version() {
    assert_eq!(strip_version_suffix("http://host/api/v1"), "http://host/api");
    assert_eq!(strip_version_suffix("http://host/v2/chat/completions"), "http://host");
    assert_eq!(strip_version_suffix("http://host/api"), "http://host/api");
    assert_eq!(strip_version_suffix("http://host/v1/models"), "http://host/v1/models");
}

#[test]
fn gitee_endpoint_completes_partial_urls() {
    assert_eq!(gitee_endpoint("https://ai.gitee.com/v1/chat/completions"), "https://ai.gitee.com/v1/chat/completions");
    assert_eq!(gitee_endpoint("https://ai.gitee.com/v1"), "https://ai.gitee.com/v1/chat/completions");
    assert_eq!(
        gitee_endpoint("https://open.bigmodel.cn/api/paas/v4"),
        "https://open.bigmodel.cn/api/paas/v4/chat/completions"
    );
    assert_eq!(gitee_endpoint("https://gateway.local"), "https://gateway.local/v1/chat/completions");
}

// =========================================================================
// map_server_config
// =========================================================================

#[test]
fn openai_provider_strips_version_and_placeholder_key() {
    let provider = json!({ "type": "openai", "baseURL": "http://localhost:29847/api/aieditor/v1/", "apiKey": "use-header" });
    let config = map_server_config(&server_config(provider, None)).unwrap();

    assert_eq!(config.kind(), "openai");
    assert_eq!(config.command_panel_model, "openai");
    let settings = config.settings().unwrap();
    assert_eq!(settings["endpoint"], "http://localhost:29847/api/aieditor");
    assert_eq!(settings["model"], "gpt-4o");
    assert!(settings.get("apiKey").is_none());
}

#[test]
fn default_model_prefers_bubble_then_command_panel() {
    let provider = json!({ "type": "openai", "apiKey": "sk-1" });
    let defaults = PanelDefaults { bubble_panel_model: None, command_panel_model: Some("qwen-max".into()) };
    let config = map_server_config(&server_config(provider.clone(), Some(defaults))).unwrap();
    assert_eq!(config.settings().unwrap()["model"], "qwen-max");
    assert_eq!(config.settings().unwrap()["apiKey"], "sk-1");

    let defaults = PanelDefaults { bubble_panel_model: Some("gpt-4o".into()), command_panel_model: Some("qwen-max".into()) };
    let config = map_server_config(&server_config(provider, Some(defaults))).unwrap();
    assert_eq!(config.settings().unwrap()["model"], "gpt-4o");
}

#[test]
fn first_model_in_server_order_is_default() {
    let config: ServerEditorConfig = serde_json::from_str(
        r#"{
            "providers": { "proxy": { "type": "openai" } },
            "models": { "zeta": { "provider": "proxy" }, "alpha": { "provider": "proxy" } }
        }"#,
    )
    .unwrap();

    let config = map_server_config(&config).unwrap();

    assert_eq!(config.settings().unwrap()["model"], "zeta");
}

#[test]
fn gitee_provider_gets_chat_endpoint() {
    let provider = json!({ "type": "Gitee", "baseURL": "https://ai.gitee.com/v1", "apiKey": "k" });
    let config = map_server_config(&server_config(provider, None)).unwrap();

    assert_eq!(config.kind(), "gitee");
    assert_eq!(config.settings().unwrap()["endpoint"], "https://ai.gitee.com/v1/chat/completions");
    assert_eq!(config.settings().unwrap()["apiKey"], "k");
}

#[test]
fn spark_provider_passes_through() {
    let provider = json!({ "type": "spark", "appId": "app", "apiSecret": "s" });
    let config = map_server_config(&server_config(provider.clone(), None)).unwrap();

    assert_eq!(config.kind(), "spark");
    assert_eq!(config.settings(), Some(&provider));
}

#[test]
fn unknown_provider_uses_unmodified_openai_shape() {
    let provider = json!({ "type": "mystery", "baseURL": "http://x/v1", "apiKey": "use-header" });
    let config = map_server_config(&server_config(provider, None)).unwrap();

    assert_eq!(config.kind(), "openai");
    assert_eq!(config.settings().unwrap()["endpoint"], "http://x/v1");
    assert_eq!(config.settings().unwrap()["apiKey"], "use-header");
}

#[test]
fn missing_pieces_are_invalid() {
    let empty = ServerEditorConfig::default();
    assert!(matches!(map_server_config(&empty), Err(EditorConfigError::Invalid(_))));

    let orphan = ServerEditorConfig {
        providers: json!({}).as_object().cloned(),
        models: json!({ "m": { "provider": "gone" } }).as_object().cloned(),
        defaults: None,
    };
    assert!(matches!(map_server_config(&orphan), Err(EditorConfigError::Invalid(_))));
}

// =========================================================================
// environment fallback
// =========================================================================

#[test]
fn env_openai_requires_key_and_model() {
    let env = EnvAiSettings { provider_type: "openai".into(), api_key: "sk".into(), ..EnvAiSettings::default() };
    assert!(env.to_config().is_none());

    let env = EnvAiSettings {
        model: " gpt-4o-mini , gpt-4o".into(),
        base_url: "https://api.example.com/v1/chat/completions".into(),
        ..env
    };
    let config = env.to_config().unwrap();
    let settings = config.settings().unwrap();
    assert_eq!(settings["model"], "gpt-4o-mini");
    assert_eq!(settings["endpoint"], "https://api.example.com");
    assert_eq!(settings["apiKey"], "sk");
}

#[test]
fn env_gitee_model_is_optional() {
    let env = EnvAiSettings {
        provider_type: "gitee".into(),
        base_url: "https://gateway.local/".into(),
        api_key: "k".into(),
        ..EnvAiSettings::default()
    };
    let config = env.to_config().unwrap();
    let settings = config.settings().unwrap();
    assert_eq!(settings["endpoint"], "https://gateway.local/v1/chat/completions");
    assert!(settings.get("model").is_none());
}

#[test]
fn env_spark_and_wenxin_include_only_set_fields() {
    let spark = EnvAiSettings {
        provider_type: "spark".into(),
        spark_app_id: "app".into(),
        spark_version: "v3.5".into(),
        ..EnvAiSettings::default()
    };
    assert_eq!(spark.to_config().unwrap().settings(), Some(&json!({ "appId": "app", "version": "v3.5" })));

    let wenxin = EnvAiSettings { provider_type: "wenxin".into(), ..EnvAiSettings::default() };
    assert!(wenxin.to_config().is_none());
    let wenxin = EnvAiSettings { wenxin_access_token: "t".into(), ..wenxin };
    assert_eq!(wenxin.to_config().unwrap().settings(), Some(&json!({ "access_token": "t" })));
}

#[test]
fn env_unknown_provider_disables_ai() {
    let env = EnvAiSettings { provider_type: "custom".into(), api_key: "k".into(), model: "m".into(), ..EnvAiSettings::default() };
    assert!(env.to_config().is_none());
}

// =========================================================================
// resolve
// =========================================================================

#[tokio::test]
async fn resolve_prefers_server_config() {
    let router = axum::Router::new().route(
        "/aieditor/model-config/aieditor",
        get(|| async {
            ok(json!({
                "providers": { "proxy": { "type": "openai", "baseURL": "http://h/api/aieditor/v1", "apiKey": "use-header" } },
                "models": { "gpt-4o": { "provider": "proxy" } },
                "defaults": { "bubblePanelModel": "gpt-4o" }
            }))
        }),
    );
    let host = serve(router).await;
    let (client, notices) = client_for(&host);

    let config = resolve(&client, &EnvAiSettings::default()).await.unwrap();

    assert_eq!(config.settings().unwrap()["endpoint"], "http://h/api/aieditor");
    assert!(notices.drain().is_empty());
}

#[tokio::test]
async fn resolve_falls_back_to_env_then_disabled() {
    let router = axum::Router::new().route("/aieditor/model-config/aieditor", get(|| async { fail(500, "no config") }));
    let host = serve(router).await;
    let (client, notices) = client_for(&host);

    let env = EnvAiSettings {
        provider_type: "openai".into(),
        api_key: "sk".into(),
        model: "gpt-4o".into(),
        ..EnvAiSettings::default()
    };
    let config = resolve(&client, &env).await.unwrap();
    assert_eq!(config.settings().unwrap()["model"], "gpt-4o");

    assert!(resolve(&client, &EnvAiSettings::default()).await.is_none());
    assert!(notices.drain().is_empty());
}
