//! Login, token verification, and admin bootstrap (`/login`, `/checkToken`,
//! `/register-admin`).

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;
use crate::session::Profile;

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterAdminRequest {
    pub username: String,
    pub password: String,
    /// Required once any admin exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
}

/// Token plus the profile fields returned next to it.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(flatten)]
    pub profile: Profile,
}

pub struct AuthApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] with code 401 for bad credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        self.client.fetch(ApiRequest::post("/login").json(request)?).await
    }

    /// Ask the server whether `token` is still valid and for whom.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] with code 401 when expired.
    pub async fn check_token(&self, token: &str) -> Result<Profile, ApiError> {
        let body = serde_json::json!({ "key": token });
        self.client.fetch(ApiRequest::post("/checkToken").json(&body)?).await
    }

    /// Same as [`AuthApi::check_token`] without user notifications, for
    /// background session checks that report expiry themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] with code 401 when expired.
    pub async fn check_token_quiet(&self, token: &str) -> Result<Profile, ApiError> {
        let body = serde_json::json!({ "key": token });
        self.client.fetch(ApiRequest::post("/checkToken").json(&body)?.quiet()).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Application`] with code 403 when not permitted.
    pub async fn register_admin(&self, request: &RegisterAdminRequest) -> Result<LoginData, ApiError> {
        self.client.fetch(ApiRequest::post("/register-admin").json(request)?).await
    }
}
