//! Member self-registration with an admin invite code.

use serde::Serialize;

use super::ApiClient;
use super::auth::LoginData;
use crate::error::ApiError;
use crate::net::ApiRequest;

#[derive(Clone, Debug, Serialize)]
pub struct RegisterWithInviteRequest {
    pub username: String,
    pub password: String,
    pub invite_code: String,
}

pub struct InviteApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl InviteApi<'_> {
    /// Sent without a bearer token; returns a ready-to-use session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] for invalid or expired codes.
    pub async fn register_with_invite(&self, request: &RegisterWithInviteRequest) -> Result<LoginData, ApiError> {
        self.client.fetch(ApiRequest::post("/register-with-invite").json(request)?).await
    }
}
