//! Model configuration CRUD (`/model-config/*`).

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

/// One OpenAI-compatible model configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub status_cd: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Fields for creating or updating a configuration; `None` leaves a field
/// unchanged on update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfigInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_cd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Filters for [`ModelConfigApi::list`].
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfigQuery {
    pub page: u32,
    pub page_size: u32,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub status_cd: Option<String>,
}

impl Default for ModelConfigQuery {
    fn default() -> Self {
        Self { page: 1, page_size: 20, user_id: None, name: None, model: None, status_cd: None }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ModelConfigPage {
    #[serde(default)]
    pub list: Vec<ModelConfig>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

pub struct ModelConfigApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl ModelConfigApi<'_> {
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list(&self, query: &ModelConfigQuery) -> Result<ModelConfigPage, ApiError> {
        let request = ApiRequest::get("/model-config/list")
            .query("page", query.page)
            .query("page_size", query.page_size)
            .query_opt("user_id", query.user_id.as_deref())
            .query_opt("name", query.name.as_deref())
            .query_opt("model", query.model.as_deref())
            .query_opt("status_cd", query.status_cd.as_deref());
        self.client.fetch(request).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn detail(&self, model_id: i64) -> Result<ModelConfig, ApiError> {
        self.client.fetch(ApiRequest::get(format!("/model-config/{model_id}"))).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create(&self, input: &ModelConfigInput) -> Result<ModelConfig, ApiError> {
        self.client.fetch(ApiRequest::post("/model-config/create").json(input)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update(&self, model_id: i64, input: &ModelConfigInput) -> Result<ModelConfig, ApiError> {
        self.client.fetch(ApiRequest::put(format!("/model-config/{model_id}")).json(input)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete(&self, model_id: i64) -> Result<(), ApiError> {
        self.client.execute(ApiRequest::delete(format!("/model-config/{model_id}"))).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn set_default(&self, model_id: i64) -> Result<(), ApiError> {
        self.client.execute(ApiRequest::post("/model-config/set-default").query("model_id", model_id)).await?;
        Ok(())
    }

    /// Default configuration for `user_id`, or the global default.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn default_for(&self, user_id: Option<&str>) -> Result<Option<ModelConfig>, ApiError> {
        self.client
            .fetch(ApiRequest::get("/model-config/default").query_opt("user_id", user_id))
            .await
    }
}
