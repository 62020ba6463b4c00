//! AI configuration for the rich-text editor.
//!
//! DESIGN
//! ======
//! The editor's AI panels take `{ models: { <kind>: {...} },
//! bubblePanelModel, commandPanelModel }` with exactly one model entry.
//! The preferred source is the backend, which proxies the LLM and describes
//! it as named `providers` plus named `models`. When the backend config is
//! unavailable the client falls back to direct provider settings from the
//! environment. Both paths normalize endpoints so the editor, which appends
//! `/v1/chat/completions` itself for OpenAI-style providers, never ends up
//! with a doubled version segment.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

pub const EDITOR_CONFIG_PATH: &str = "/aieditor/model-config/aieditor";

/// Placeholder key meaning "the proxy injects the key itself".
const USE_HEADER_KEY: &str = "use-header";
const DEFAULT_SPARK_VERSION: &str = "v3.5";

static VERSION_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"/v\d+(/chat/completions)?$"));
static CHAT_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"/chat/completions/?$"));
static VERSION_SEGMENT: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"/v\d+(/|$)"));
static BIGMODEL_PATH: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"/paas/v\d+"));

#[derive(Debug, thiserror::Error)]
pub enum EditorConfigError {
    #[error(transparent)]
    Request(#[from] ApiError),

    #[error("invalid editor config: {0}")]
    Invalid(&'static str),
}

/// Editor AI settings with a single model entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorAiConfig {
    pub models: Map<String, Value>,
    #[serde(rename = "bubblePanelModel")]
    pub bubble_panel_model: String,
    #[serde(rename = "commandPanelModel")]
    pub command_panel_model: String,
}

impl EditorAiConfig {
    fn single(kind: &str, settings: Value) -> Self {
        let mut models = Map::new();
        models.insert(kind.to_owned(), settings);
        Self { models, bubble_panel_model: kind.to_owned(), command_panel_model: kind.to_owned() }
    }

    /// Provider kind the panels use (`openai`, `gitee`, ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.bubble_panel_model
    }

    #[must_use]
    pub fn settings(&self) -> Option<&Value> {
        self.models.get(&self.bubble_panel_model)
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PanelDefaults {
    #[serde(default, rename = "bubblePanelModel")]
    pub bubble_panel_model: Option<String>,
    #[serde(default, rename = "commandPanelModel")]
    pub command_panel_model: Option<String>,
}

/// Backend description of the proxied LLM.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerEditorConfig {
    #[serde(default)]
    pub providers: Option<Map<String, Value>>,
    #[serde(default)]
    pub models: Option<Map<String, Value>>,
    #[serde(default)]
    pub defaults: Option<PanelDefaults>,
}

/// Fetch the backend config and map it to editor settings.
///
/// # Errors
///
/// Returns [`EditorConfigError::Request`] when the call fails and
/// [`EditorConfigError::Invalid`] when the payload cannot be mapped.
pub async fn fetch_server_config(client: &ApiClient) -> Result<EditorAiConfig, EditorConfigError> {
    let data: Option<ServerEditorConfig> = client.fetch(ApiRequest::get(EDITOR_CONFIG_PATH).quiet()).await?;
    let data = data.ok_or(EditorConfigError::Invalid("empty payload"))?;
    map_server_config(&data)
}

/// Map the backend's providers/models shape to editor settings.
///
/// # Errors
///
/// Returns [`EditorConfigError::Invalid`] when providers or models are
/// missing, or the default model has no provider.
pub fn map_server_config(config: &ServerEditorConfig) -> Result<EditorAiConfig, EditorConfigError> {
    let (Some(providers), Some(models)) = (&config.providers, &config.models) else {
        return Err(EditorConfigError::Invalid("missing providers or models"));
    };

    let defaults = config.defaults.clone().unwrap_or_default();
    let model_key = non_empty(defaults.bubble_panel_model.as_deref())
        .or_else(|| non_empty(defaults.command_panel_model.as_deref()))
        .map(str::to_owned)
        .or_else(|| models.keys().next().cloned())
        .ok_or(EditorConfigError::Invalid("missing default model"))?;

    let provider = models
        .get(&model_key)
        .and_then(|model| model.get("provider"))
        .and_then(Value::as_str)
        .and_then(|name| providers.get(name))
        .ok_or(EditorConfigError::Invalid("missing provider for default model"))?;

    let kind = provider
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("openai")
        .to_ascii_lowercase();
    let base_url = provider.get("baseURL").and_then(Value::as_str).unwrap_or_default();
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
    let api_key = provider.get("apiKey").and_then(Value::as_str).unwrap_or_default();

    let mapped = match kind.as_str() {
        "openai" => {
            let mut settings = json!({ "model": model_key });
            if !base_url.is_empty() {
                settings["endpoint"] = json!(strip_version_suffix(base_url));
            }
            if !api_key.is_empty() && api_key != USE_HEADER_KEY {
                settings["apiKey"] = json!(api_key);
            }
            EditorAiConfig::single("openai", settings)
        }
        "gitee" => {
            let endpoint = if is_match(&CHAT_SUFFIX, base_url) {
                base_url.to_owned()
            } else {
                format!("{base_url}/chat/completions")
            };
            let mut settings = json!({ "endpoint": endpoint, "model": model_key });
            if !api_key.is_empty() {
                settings["apiKey"] = json!(api_key);
            }
            EditorAiConfig::single("gitee", settings)
        }
        passthrough @ ("spark" | "wenxin" | "custom") => EditorAiConfig::single(passthrough, provider.clone()),
        other => {
            debug!(kind = other, "unknown editor provider type, using openai shape");
            let mut settings = json!({ "model": model_key });
            if !base_url.is_empty() {
                settings["endpoint"] = json!(base_url);
            }
            if !api_key.is_empty() {
                settings["apiKey"] = json!(api_key);
            }
            EditorAiConfig::single("openai", settings)
        }
    };
    Ok(mapped)
}

// =============================================================================
// ENVIRONMENT FALLBACK
// =============================================================================

/// Direct provider settings for when the backend config is unavailable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvAiSettings {
    pub provider_type: String,
    pub base_url: String,
    pub api_key: String,
    /// Comma-separated; the first entry is used.
    pub model: String,
    pub spark_app_id: String,
    pub spark_api_key: String,
    pub spark_api_secret: String,
    pub spark_version: String,
    pub spark_protocol: String,
    pub wenxin_access_token: String,
    pub wenxin_protocol: String,
    pub wenxin_version: String,
}

impl EnvAiSettings {
    /// Read settings from environment variables.
    ///
    /// Optional:
    /// - `AI_PROVIDER_TYPE`: `openai` (default), `gitee`, `spark`, `wenxin`
    /// - `AI_BASE_URL`, `AI_API_KEY`, `AI_MODEL`
    /// - `SPARK_APP_ID`, `SPARK_API_KEY`, `SPARK_API_SECRET`,
    ///   `SPARK_VERSION` (default `v3.5`), `SPARK_PROTOCOL`
    /// - `WENXIN_ACCESS_TOKEN`, `WENXIN_PROTOCOL`, `WENXIN_VERSION`
    #[must_use]
    pub fn from_env() -> Self {
        let provider_type = env_string("AI_PROVIDER_TYPE").to_ascii_lowercase();
        let spark_version = env_string("SPARK_VERSION");
        Self {
            provider_type: if provider_type.is_empty() { "openai".to_owned() } else { provider_type },
            base_url: env_string("AI_BASE_URL"),
            api_key: env_string("AI_API_KEY"),
            model: env_string("AI_MODEL"),
            spark_app_id: env_string("SPARK_APP_ID"),
            spark_api_key: env_string("SPARK_API_KEY"),
            spark_api_secret: env_string("SPARK_API_SECRET"),
            spark_version: if spark_version.is_empty() { DEFAULT_SPARK_VERSION.to_owned() } else { spark_version },
            spark_protocol: env_string("SPARK_PROTOCOL"),
            wenxin_access_token: env_string("WENXIN_ACCESS_TOKEN"),
            wenxin_protocol: env_string("WENXIN_PROTOCOL"),
            wenxin_version: env_string("WENXIN_VERSION"),
        }
    }

    /// Editor settings, or `None` when the chosen provider lacks its
    /// required fields or is not supported.
    #[must_use]
    pub fn to_config(&self) -> Option<EditorAiConfig> {
        let model = self.model.split(',').map(str::trim).find(|m| !m.is_empty());
        let base_url = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);

        match self.provider_type.as_str() {
            "openai" => {
                let model = model?;
                if self.api_key.is_empty() {
                    return None;
                }
                let mut settings = json!({ "apiKey": self.api_key, "model": model });
                if !base_url.is_empty() {
                    settings["endpoint"] = json!(strip_version_suffix(base_url));
                }
                Some(EditorAiConfig::single("openai", settings))
            }
            "gitee" => {
                if base_url.is_empty() || self.api_key.is_empty() {
                    return None;
                }
                let mut settings = json!({ "endpoint": gitee_endpoint(base_url), "apiKey": self.api_key });
                if let Some(model) = model {
                    settings["model"] = json!(model);
                }
                Some(EditorAiConfig::single("gitee", settings))
            }
            "spark" => {
                if self.spark_app_id.is_empty() {
                    return None;
                }
                let mut settings = json!({ "appId": self.spark_app_id });
                insert_non_empty(&mut settings, "apiKey", &self.spark_api_key);
                insert_non_empty(&mut settings, "apiSecret", &self.spark_api_secret);
                insert_non_empty(&mut settings, "version", &self.spark_version);
                insert_non_empty(&mut settings, "protocol", &self.spark_protocol);
                Some(EditorAiConfig::single("spark", settings))
            }
            "wenxin" => {
                if self.wenxin_access_token.is_empty() {
                    return None;
                }
                let mut settings = json!({ "access_token": self.wenxin_access_token });
                insert_non_empty(&mut settings, "protocol", &self.wenxin_protocol);
                insert_non_empty(&mut settings, "version", &self.wenxin_version);
                Some(EditorAiConfig::single("wenxin", settings))
            }
            _ => None,
        }
    }
}

/// Backend config first, then `env`; `None` disables editor AI.
pub async fn resolve(client: &ApiClient, env: &EnvAiSettings) -> Option<EditorAiConfig> {
    match fetch_server_config(client).await {
        Ok(config) => return Some(config),
        Err(e) => warn!(error = %e, "editor config unavailable from server, trying environment"),
    }
    env.to_config()
}

// =============================================================================
// ENDPOINT HELPERS
// =============================================================================

/// Drop a trailing `/vN` or `/vN/chat/completions`.
#[must_use]
pub fn strip_version_suffix(url: &str) -> String {
    match VERSION_SUFFIX.as_ref() {
        Some(re) => re.replace(url, "").into_owned(),
        None => url.to_owned(),
    }
}

/// Full chat-completions endpoint for a gitee-style gateway given either the
/// endpoint itself, a versioned base, or a bare host.
#[must_use]
pub fn gitee_endpoint(base_url: &str) -> String {
    let lower = base_url.to_ascii_lowercase();
    if is_match(&CHAT_SUFFIX, &lower) {
        base_url.to_owned()
    } else if is_match(&VERSION_SEGMENT, &lower) || lower.contains("open.bigmodel.cn") || is_match(&BIGMODEL_PATH, &lower) {
        format!("{base_url}/chat/completions")
    } else {
        format!("{base_url}/v1/chat/completions")
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "invalid endpoint pattern");
            None
        }
    }
}

fn is_match(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}

fn insert_non_empty(settings: &mut Value, key: &str, value: &str) {
    if !value.is_empty() {
        settings[key] = json!(value);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn env_string(key: &str) -> String {
    std::env::var(key).map(|v| v.trim().to_owned()).unwrap_or_default()
}
