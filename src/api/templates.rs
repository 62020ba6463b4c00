//! Writing templates (`/templates/*`).
//!
//! Template payloads are produced and consumed by the editor as opaque JSON,
//! so most calls take any serializable body and return `data` untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

/// Body of `createTemplateEntryTable`: generate a template with AI and save it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateCreateRequest {
    #[serde(rename = "titleName")]
    pub title_name: String,
    #[serde(rename = "writingRequirement")]
    pub writing_requirement: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "templateName")]
    pub template_name: String,
    #[serde(rename = "modelId", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<i64>,
    #[serde(rename = "exampleOutput", skip_serializing_if = "Option::is_none")]
    pub example_output: Option<String>,
}

pub struct TemplatesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl TemplatesApi<'_> {
    async fn call(&self, path: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        self.client.fetch(ApiRequest::post(path).json(body)?).await
    }

    /// Writing templates visible to a user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/templateQuery", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn title_data_query(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/titleDataQuery", body).await
    }

    /// Generate a title outline without saving it.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/create", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn refresh(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/refresh", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn save(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/templateSave", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn delete(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/templateDelete", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/templateUpdate", body).await
    }

    /// Generate a template with AI and store it; returns the full envelope
    /// `data`, whose own `data` member holds the template.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create_entry_table(&self, request: &TemplateCreateRequest) -> Result<Value, ApiError> {
        self.call("/templates/createTemplateEntryTable", request).await
    }

    /// Templates previously generated with AI.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query_created(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/queryCreateTemplateList", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn rename_created(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/reCreateTemplateName", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn delete_created(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/deleteCreateTemplate", body).await
    }

    /// A user's frequently used templates.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query_usual(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/queryUsuallyTemplate", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query_all(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/queryTemplateList", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn rename(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/templates/reTemplateName", body).await
    }
}
