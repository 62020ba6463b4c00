//! Admin member management (`/admin/*`). Every call requires an admin token.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

pub const DEFAULT_INVITE_EXPIRE_HOURS: u32 = 24;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Invite {
    pub invite_code: String,
    #[serde(default)]
    pub expire_time: Option<String>,
}

/// A member account managed by the current admin.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// `Y` active, `N` disabled.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// Filters for [`AdminApi::list_records`]; empty strings mean "any".
#[derive(Clone, Debug, PartialEq)]
pub struct RecordQuery {
    pub member_user_id: String,
    pub member_phone: String,
    pub kind: String,
    pub kw: String,
    pub time_from: String,
    pub time_to: String,
    pub page_num: u32,
    pub page_size: u32,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            member_user_id: String::new(),
            member_phone: String::new(),
            kind: String::new(),
            kw: String::new(),
            time_from: String::new(),
            time_to: String::new(),
            page_num: 1,
            page_size: 50,
        }
    }
}

pub struct AdminApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AdminApi<'_> {
    /// Create a single-use invite code valid for `expire_hours`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Application`] with code 403 for non-admins.
    pub async fn create_invite(&self, expire_hours: Option<u32>) -> Result<Invite, ApiError> {
        let body = serde_json::json!({ "expire_hours": expire_hours.unwrap_or(DEFAULT_INVITE_EXPIRE_HOURS) });
        self.client.fetch(ApiRequest::post("/admin/invite/create").json(&body)?).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list_users(&self, kw: &str, page_num: u32, page_size: u32) -> Result<Page<Member>, ApiError> {
        let request = ApiRequest::get("/admin/users")
            .query("kw", kw)
            .query("pageNum", page_num)
            .query("pageSize", page_size);
        self.client.fetch(request).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn reset_password(&self, user_id: &str, new_password: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "user_id": user_id, "new_password": new_password });
        self.client.execute(ApiRequest::post("/admin/users/reset-password").json(&body)?).await?;
        Ok(())
    }

    /// Enable (`"Y"`) or disable (`"N"`) a member.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn set_status(&self, user_id: &str, status: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "user_id": user_id, "status": status });
        self.client.execute(ApiRequest::post("/admin/users/status").json(&body)?).await?;
        Ok(())
    }

    /// Solutions and uploads created by the admin's members.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list_records(&self, query: &RecordQuery) -> Result<Page<Value>, ApiError> {
        let request = ApiRequest::get("/admin/records")
            .query("member_user_id", &query.member_user_id)
            .query("member_phone", &query.member_phone)
            .query("type", &query.kind)
            .query("kw", &query.kw)
            .query("time_from", &query.time_from)
            .query("time_to", &query.time_to)
            .query("pageNum", query.page_num)
            .query("pageSize", query.page_size);
        self.client.fetch(request).await
    }
}
