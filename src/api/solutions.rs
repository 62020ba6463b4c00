//! Saved solutions and AI generation endpoints (`/solution/*`).
//!
//! Generation and optimization stream their output and are consumed by the
//! editor directly, so only their URLs are exposed here.

use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

pub const GENERATE_ARTICLE_PATH: &str = "/solution/generate-article";
pub const GENERATE_CHAPTER_PATH: &str = "/solution/generate-chapter";
pub const OPTIMIZE_CONTENT_PATH: &str = "/solution/optimize-content";

pub struct SolutionsApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl SolutionsApi<'_> {
    #[must_use]
    pub fn generate_article_url(&self) -> String {
        self.client.http().url(GENERATE_ARTICLE_PATH)
    }

    #[must_use]
    pub fn generate_chapter_url(&self) -> String {
        self.client.http().url(GENERATE_CHAPTER_PATH)
    }

    /// Expand, polish, continue, or rewrite a selection.
    #[must_use]
    pub fn optimize_content_url(&self) -> String {
        self.client.http().url(OPTIMIZE_CONTENT_PATH)
    }

    async fn call(&self, path: &str, body: &impl Serialize) -> Result<Value, ApiError> {
        self.client.fetch(ApiRequest::post(path).json(body)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn save(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/solutionSave", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/querySolution", body).await
    }

    /// Generation history.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn query_list(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/querySolutionList", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn delete(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/deleteSolution", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/updateSolution", body).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn get(&self, body: &impl Serialize) -> Result<Value, ApiError> {
        self.call("/solution/getSolution", body).await
    }
}
