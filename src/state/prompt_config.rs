//! Prompt configuration store.

#[cfg(test)]
#[path = "prompt_config_test.rs"]
mod prompt_config_test;

use crate::api::ApiClient;
use crate::api::prompt_config::{PromptConfig, PromptConfigInput};
use crate::error::ApiError;

#[derive(Clone, Debug, Default)]
pub struct PromptConfigStore {
    pub prompt_list: Vec<PromptConfig>,
    pub loading: bool,
}

impl PromptConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn fetch_list(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        self.loading = true;
        let result = client.prompts().list().await;
        self.loading = false;
        self.prompt_list = result?;
        Ok(())
    }

    /// Look a prompt up on the server without touching the list.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn by_type(&self, client: &ApiClient, prompt_type: &str) -> Result<Option<PromptConfig>, ApiError> {
        client.prompts().by_type(prompt_type).await
    }

    /// Prompt of `prompt_type` from the last fetched list.
    #[must_use]
    pub fn cached(&self, prompt_type: &str) -> Option<&PromptConfig> {
        self.prompt_list.iter().find(|p| p.prompt_type == prompt_type)
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn update(&mut self, client: &ApiClient, id: i64, input: &PromptConfigInput) -> Result<(), ApiError> {
        client.prompts().update(id, input).await?;
        self.fetch_list(client).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn update_by_type(
        &mut self,
        client: &ApiClient,
        prompt_type: &str,
        input: &PromptConfigInput,
    ) -> Result<(), ApiError> {
        client.prompts().update_by_type(prompt_type, input).await?;
        self.fetch_list(client).await
    }
}
