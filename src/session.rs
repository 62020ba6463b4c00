//! Session context: the bearer token and user profile.
//!
//! LIFECYCLE
//! =========
//! A session is created by a successful login, rehydrated from durable
//! storage at startup, and cleared at logout or when the server rejects the
//! token. Every change is written back under [`SESSION_STORAGE_KEY`] so a
//! restart resumes the same session.
//!
//! The context is injected into [`crate::ApiClient`], which hands the token
//! to the HTTP layer per request. Nothing else reads session state ambiently.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::storage::{self, KeyValueStore};

/// Storage key for the persisted session.
pub const SESSION_STORAGE_KEY: &str = "userStore";

/// Profile of the logged-in user as reported by login and token checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub parent_admin_id: Option<Value>,
    #[serde(default)]
    pub mobile: Option<String>,
    /// Fields the client does not interpret but keeps for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Fill derived fields: `mobile` falls back to `user_id` for older
    /// accounts that never recorded a phone number.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let missing_mobile = self.mobile.as_deref().is_none_or(str::is_empty);
        if missing_mobile {
            if let Some(user_id) = self.user_id.as_ref().filter(|id| !id.is_empty()) {
                self.mobile = Some(user_id.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or_default()
    }
}

/// Token and profile of the current user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub profile: Profile,
}

impl Session {
    /// A session counts as authenticated only with both a token and a named
    /// profile; a bare token left behind by a half-finished login does not.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() && self.profile.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() { None } else { Some(&self.token) }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    pub fn reset_token(&mut self) {
        self.token.clear();
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile.normalized();
    }

    pub fn reset_profile(&mut self) {
        self.profile = Profile::default();
    }
}

/// Shared, persisted session state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.snapshot().is_authenticated())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl SessionContext {
    /// Rehydrate the session persisted in `store`, or start empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let session: Session = storage::load_json(store.as_ref(), SESSION_STORAGE_KEY)?.unwrap_or_default();
        if session.is_authenticated() {
            info!(user = session.profile.display_name(), "restored persisted session");
        }
        Ok(Self { inner: Arc::new(RwLock::new(session)), store: Some(store) })
    }

    /// A session that is never written anywhere.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self { inner: Arc::new(RwLock::new(Session::default())), store: None }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token()
            .map(str::to_owned)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_authenticated()
    }

    /// Start a session from a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the session cannot be persisted.
    pub fn begin(&self, token: impl Into<String>, profile: Profile) -> Result<(), ApiError> {
        let token = token.into();
        self.update(|session| {
            session.set_token(token);
            session.set_profile(profile);
        })
    }

    /// Drop token and profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the cleared session cannot be persisted.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.update(|session| {
            session.reset_token();
            session.reset_profile();
        })
    }

    /// Apply `change` and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] or [`ApiError::Encode`] if persisting fails;
    /// the in-memory change is kept either way.
    pub fn update(&self, change: impl FnOnce(&mut Session)) -> Result<(), ApiError> {
        let snapshot = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            change(&mut guard);
            guard.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, session: &Session) -> Result<(), ApiError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        storage::save_json(store.as_ref(), SESSION_STORAGE_KEY, session).inspect_err(|e| {
            warn!(error = %e, "failed to persist session");
        })
    }
}
