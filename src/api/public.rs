//! Unauthenticated site configuration (`/public-configs`).

use serde_json::{Map, Value};

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

pub struct PublicApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl PublicApi<'_> {
    /// Public key/value configs such as `usage_doc_url`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn configs(&self) -> Result<Map<String, Value>, ApiError> {
        let configs: Option<Map<String, Value>> = self.client.fetch(ApiRequest::get("/public-configs")).await?;
        Ok(configs.unwrap_or_default())
    }
}
