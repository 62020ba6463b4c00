//! Request builders, one module per backend resource.
//!
//! DESIGN
//! ======
//! [`ApiClient`] pairs the HTTP wrapper with the session context. Resource
//! handles (`client.files()`, `client.models()`, ...) borrow the client and
//! translate typed arguments into [`ApiRequest`]s; they hold no state and
//! make no decisions beyond request shape.

pub mod admin;
pub mod auth;
pub mod files;
pub mod invite;
pub mod model_config;
pub mod prompt_config;
pub mod public;
pub mod solutions;
pub mod templates;
pub mod user;

#[cfg(test)]
pub mod test_helpers;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::notify::Notifier;
use crate::net::{ApiRequest, Envelope, HttpClient};
use crate::session::SessionContext;
use crate::storage::KeyValueStore;

/// Entry point for every backend call.
pub struct ApiClient {
    http: HttpClient,
    session: SessionContext,
}

impl ApiClient {
    #[must_use]
    pub fn new(http: HttpClient, session: SessionContext) -> Self {
        Self { http, session }
    }

    /// Build a client from config, rehydrating the session from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the HTTP client cannot
    /// be built, or persisted state cannot be read.
    pub fn from_config(
        config: &ClientConfig,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(config, notifier)?;
        let session = SessionContext::load(store)?;
        Ok(Self::new(http, session))
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Send with the current session token.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::execute`].
    pub async fn execute(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        let token = self.session.token();
        self.http.execute(request, token.as_deref()).await
    }

    /// Send with the current session token and decode `data`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::fetch`].
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let token = self.session.token();
        self.http.fetch(request, token.as_deref()).await
    }

    #[must_use]
    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi { client: self }
    }

    #[must_use]
    pub fn files(&self) -> files::FilesApi<'_> {
        files::FilesApi { client: self }
    }

    #[must_use]
    pub fn templates(&self) -> templates::TemplatesApi<'_> {
        templates::TemplatesApi { client: self }
    }

    #[must_use]
    pub fn solutions(&self) -> solutions::SolutionsApi<'_> {
        solutions::SolutionsApi { client: self }
    }

    #[must_use]
    pub fn models(&self) -> model_config::ModelConfigApi<'_> {
        model_config::ModelConfigApi { client: self }
    }

    #[must_use]
    pub fn prompts(&self) -> prompt_config::PromptConfigApi<'_> {
        prompt_config::PromptConfigApi { client: self }
    }

    #[must_use]
    pub fn admin(&self) -> admin::AdminApi<'_> {
        admin::AdminApi { client: self }
    }

    #[must_use]
    pub fn users(&self) -> user::UserApi<'_> {
        user::UserApi { client: self }
    }

    #[must_use]
    pub fn invites(&self) -> invite::InviteApi<'_> {
        invite::InviteApi { client: self }
    }

    #[must_use]
    pub fn public(&self) -> public::PublicApi<'_> {
        public::PublicApi { client: self }
    }
}

