//! Current user: login, logout, and session expiry.
//!
//! The store is a view over the [`SessionContext`] shared with the
//! [`ApiClient`], so a login here is immediately visible to every request.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use tracing::info;

use crate::api::ApiClient;
use crate::api::auth::{LoginData, LoginRequest};
use crate::api::invite::RegisterWithInviteRequest;
use crate::error::ApiError;
use crate::net::NoticeLevel;
use crate::session::{Profile, SessionContext};

pub const SESSION_EXPIRED_NOTICE: &str = "session expired, please log in again";

#[derive(Clone, Debug)]
pub struct UserStore {
    session: SessionContext,
}

impl UserStore {
    /// Store over the session `client` sends requests with.
    #[must_use]
    pub fn new(client: &ApiClient) -> Self {
        Self { session: client.session().clone() }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    #[must_use]
    pub fn profile(&self) -> Profile {
        self.session.snapshot().profile
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted.
    pub fn set_token(&self, token: &str) -> Result<(), ApiError> {
        self.session.update(|s| s.set_token(token))
    }

    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted.
    pub fn reset_token(&self) -> Result<(), ApiError> {
        self.session.update(crate::session::Session::reset_token)
    }

    /// Replace the profile; a missing `mobile` falls back to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted.
    pub fn set_profile(&self, profile: Profile) -> Result<(), ApiError> {
        self.session.update(|s| s.set_profile(profile))
    }

    /// # Errors
    ///
    /// Returns a storage error if the session cannot be persisted.
    pub fn reset_profile(&self) -> Result<(), ApiError> {
        self.session.update(crate::session::Session::reset_profile)
    }

    /// Log in and start a session.
    ///
    /// # Errors
    ///
    /// Returns the API error for bad credentials, or a storage error.
    pub async fn login(&self, client: &ApiClient, username: &str, password: &str) -> Result<Profile, ApiError> {
        let request = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let data = client.auth().login(&request).await?;
        self.begin(data)
    }

    /// Register a member account with an invite code and start a session.
    ///
    /// # Errors
    ///
    /// Returns the API error for bad codes, or a storage error.
    pub async fn register_with_invite(
        &self,
        client: &ApiClient,
        request: &RegisterWithInviteRequest,
    ) -> Result<Profile, ApiError> {
        let data = client.invites().register_with_invite(request).await?;
        self.begin(data)
    }

    /// # Errors
    ///
    /// Returns a storage error if the cleared session cannot be persisted.
    pub fn logout(&self) -> Result<(), ApiError> {
        info!("logged out");
        self.session.clear()
    }

    /// Ask the server whether the stored token is still valid.
    ///
    /// Returns `Ok(false)` without a request when there is no token, and
    /// `Ok(false)` after clearing the session when the server rejects it.
    /// Transport failures keep the session and return the error.
    ///
    /// # Errors
    ///
    /// Returns non-authorization API errors and storage errors.
    pub async fn verify_token(&self, client: &ApiClient) -> Result<bool, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(false);
        };
        match client.auth().check_token_quiet(&token).await {
            Ok(profile) => {
                self.set_profile(profile)?;
                Ok(true)
            }
            Err(e) if e.is_unauthorized() => {
                info!(error = %e, "session rejected by server");
                client.http().notifier().notify(NoticeLevel::Warning, SESSION_EXPIRED_NOTICE);
                self.session.clear()?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn begin(&self, data: LoginData) -> Result<Profile, ApiError> {
        self.session.begin(data.token, data.profile)?;
        let profile = self.profile();
        info!(user = profile.display_name(), admin = profile.is_admin, "logged in");
        Ok(profile)
    }
}
