//! Current-user account endpoints (`/user/*`).

use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;
use crate::session::Profile;

pub struct UserApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl UserApi<'_> {
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] when the old password is wrong.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<Value, ApiError> {
        let body = serde_json::json!({ "old_password": old_password, "new_password": new_password });
        self.client.fetch(ApiRequest::post("/user/change-password").json(&body)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.client.fetch(ApiRequest::get("/user/profile")).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn update_profile(&self, changes: &impl Serialize) -> Result<Value, ApiError> {
        self.client.fetch(ApiRequest::put("/user/profile").json(changes)?).await
    }
}
