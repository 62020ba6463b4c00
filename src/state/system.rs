//! Public site configuration.

#[cfg(test)]
#[path = "system_test.rs"]
mod system_test;

use serde_json::{Map, Value};
use tracing::warn;

use crate::api::ApiClient;

pub const USAGE_DOC_URL_KEY: &str = "usage_doc_url";

#[derive(Clone, Debug, Default)]
pub struct SystemStore {
    pub configs: Map<String, Value>,
}

impl SystemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the public configs. Failures are logged and the previous
    /// configs kept; nothing downstream depends on them being current.
    pub async fn fetch_public_configs(&mut self, client: &ApiClient) {
        match client.public().configs().await {
            Ok(configs) => self.configs = configs,
            Err(e) => warn!(error = %e, "failed to fetch public configs"),
        }
    }

    /// Link to the usage guide, or empty when unset.
    #[must_use]
    pub fn usage_doc_url(&self) -> &str {
        self.configs.get(USAGE_DOC_URL_KEY).and_then(Value::as_str).unwrap_or_default()
    }
}
