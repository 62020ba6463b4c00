//! Model configuration store.
//!
//! Holds the fetched page of model configs, the user's default model, and
//! the model currently selected for generation. Only the selection is
//! persisted; everything else is refetched. Every write action refetches
//! the list so the page reflects server-side ordering and defaults.

#[cfg(test)]
#[path = "model_config_test.rs"]
mod model_config_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::ApiClient;
use crate::api::model_config::{ModelConfig, ModelConfigInput, ModelConfigQuery};
use crate::error::ApiError;
use crate::storage::{self, KeyValueStore};

pub const MODEL_CONFIG_STORAGE_KEY: &str = "model-config-store";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, page_size: 20, total: 0 }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    #[serde(default)]
    current_model_id: Option<i64>,
}

#[derive(Default)]
pub struct ModelConfigStore {
    pub model_list: Vec<ModelConfig>,
    pub current_model_id: Option<i64>,
    pub default_model: Option<ModelConfig>,
    pub loading: bool,
    pub pagination: Pagination,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl std::fmt::Debug for ModelConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfigStore")
            .field("models", &self.model_list.len())
            .field("current_model_id", &self.current_model_id)
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}

impl ModelConfigStore {
    /// A store that persists nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the persisted selection from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let persisted: Persisted = storage::load_json(store.as_ref(), MODEL_CONFIG_STORAGE_KEY)?.unwrap_or_default();
        Ok(Self { current_model_id: persisted.current_model_id, store: Some(store), ..Self::default() })
    }

    /// Refetch the current page.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`]. The list is left untouched on failure.
    pub async fn fetch_list(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        let query = ModelConfigQuery {
            page: self.pagination.page,
            page_size: self.pagination.page_size,
            ..ModelConfigQuery::default()
        };
        self.fetch_list_with(client, query).await
    }

    /// Fetch with explicit filters; the query's page becomes the current page.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn fetch_list_with(&mut self, client: &ApiClient, query: ModelConfigQuery) -> Result<(), ApiError> {
        self.loading = true;
        let result = client.models().list(&query).await;
        self.loading = false;

        let page = result?;
        self.pagination.page = query.page;
        self.pagination.page_size = query.page_size;
        self.pagination.total = page.total;
        self.model_list = page.list;
        debug!(count = self.model_list.len(), total = self.pagination.total, "model configs fetched");
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn create_model(&mut self, client: &ApiClient, input: &ModelConfigInput) -> Result<(), ApiError> {
        client.models().create(input).await?;
        self.fetch_list(client).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update_model(&mut self, client: &ApiClient, id: i64, input: &ModelConfigInput) -> Result<(), ApiError> {
        client.models().update(id, input).await?;
        self.fetch_list(client).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete_model(&mut self, client: &ApiClient, id: i64) -> Result<(), ApiError> {
        client.models().delete(id).await?;
        self.fetch_list(client).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn set_default(&mut self, client: &ApiClient, id: i64) -> Result<(), ApiError> {
        client.models().set_default(id).await?;
        self.fetch_list(client).await
    }

    /// Select the model used for generation and persist the choice.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the selection cannot be persisted; the
    /// in-memory selection changes either way.
    pub fn set_current(&mut self, id: Option<i64>) -> Result<(), ApiError> {
        self.current_model_id = id;
        let Some(store) = &self.store else {
            return Ok(());
        };
        storage::save_json(store.as_ref(), MODEL_CONFIG_STORAGE_KEY, &Persisted { current_model_id: id })
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn fetch_default(&mut self, client: &ApiClient, user_id: Option<&str>) -> Result<(), ApiError> {
        self.default_model = client.models().default_for(user_id).await?;
        Ok(())
    }

    /// The explicit selection, else the default model, else the first listed.
    #[must_use]
    pub fn current_or_first(&self) -> Option<i64> {
        self.current_model_id
            .or_else(|| self.default_model.as_ref().map(|m| m.id))
            .or_else(|| self.model_list.first().map(|m| m.id))
    }
}
