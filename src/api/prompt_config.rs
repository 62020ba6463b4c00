//! Prompt configuration CRUD (`/prompt-config/*`).

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub id: i64,
    /// `template_generate`, `paragraph_generate`, `template_refresh`, ...
    pub prompt_type: String,
    pub prompt_content: String,
    #[serde(default)]
    pub status_cd: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfigInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_cd: Option<String>,
}

pub struct PromptConfigApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl PromptConfigApi<'_> {
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list(&self) -> Result<Vec<PromptConfig>, ApiError> {
        let list: Option<Vec<PromptConfig>> = self.client.fetch(ApiRequest::get("/prompt-config/list")).await?;
        Ok(list.unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn by_type(&self, prompt_type: &str) -> Result<Option<PromptConfig>, ApiError> {
        self.client.fetch(ApiRequest::get(format!("/prompt-config/type/{prompt_type}"))).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn by_id(&self, id: i64) -> Result<Option<PromptConfig>, ApiError> {
        self.client.fetch(ApiRequest::get(format!("/prompt-config/{id}"))).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create(&self, input: &PromptConfigInput) -> Result<PromptConfig, ApiError> {
        self.client.fetch(ApiRequest::post("/prompt-config/create").json(input)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn update(&self, id: i64, input: &PromptConfigInput) -> Result<(), ApiError> {
        self.client.execute(ApiRequest::put(format!("/prompt-config/{id}")).json(input)?).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn update_by_type(&self, prompt_type: &str, input: &PromptConfigInput) -> Result<(), ApiError> {
        let request = ApiRequest::put(format!("/prompt-config/type/{prompt_type}")).json(input)?;
        self.client.execute(request).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.execute(ApiRequest::delete(format!("/prompt-config/{id}"))).await?;
        Ok(())
    }
}
