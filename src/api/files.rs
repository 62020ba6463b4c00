//! Reference file upload and listing (`/file/*`).
//!
//! Uploaded files are parsed server-side in the background; a file's
//! `status_cd` moves from pending to done or failed, and the only way to
//! observe it is [`FilesApi::list`]. See [`crate::jobs::file_parse`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::net::ApiRequest;

/// Page size used when the whole list is needed in one response.
pub const FULL_LIST_PAGE_SIZE: u32 = 10_000;

/// Server-side parse state of an uploaded file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JobStatus {
    /// Nothing observed yet, or a code the client does not know.
    #[default]
    Unknown,
    Pending,
    Done,
    Failed,
}

impl JobStatus {
    /// Map a wire `status_cd` value.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Self::Pending,
            "1" => Self::Done,
            "2" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Wire code for this status; `"unknown"` has no wire form.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "0",
            Self::Done => "1",
            Self::Failed => "2",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// One row of the file list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: i64,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status_cd: Option<String>,
    /// Parse result as a JSON string; only meaningful once done.
    #[serde(default)]
    pub title_data: Option<String>,
    #[serde(default)]
    pub file_page: Option<i64>,
    #[serde(default)]
    pub create_date: Option<String>,
}

impl FileRecord {
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status_cd.as_deref().map_or(JobStatus::Unknown, JobStatus::from_code)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FileList {
    #[serde(default, rename = "fileCount")]
    pub file_count: u64,
    #[serde(default, rename = "fileList")]
    pub file_list: Vec<FileRecord>,
}

/// Query for [`FilesApi::list`].
#[derive(Clone, Debug, Serialize)]
pub struct FileListQuery {
    #[serde(rename = "busiId")]
    pub busi_id: String,
    #[serde(rename = "pageNum")]
    pub page_num: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl FileListQuery {
    /// Every file of `busi_id` in one page.
    #[must_use]
    pub fn all(busi_id: impl Into<String>) -> Self {
        Self { busi_id: busi_id.into(), page_num: 1, page_size: FULL_LIST_PAGE_SIZE }
    }
}

/// Acknowledgement of a successful upload; parsing continues server-side.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadedFile {
    pub file_id: i64,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub create_date: Option<String>,
}

pub struct FilesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl FilesApi<'_> {
    /// Upload `bytes` as `file_name` on behalf of `create_no`/`create_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] with 415 for unsupported file types.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        create_no: &str,
        create_name: &str,
    ) -> Result<UploadedFile, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("createNo", create_no.to_owned())
            .text("createName", create_name.to_owned());
        self.client.fetch(ApiRequest::post("/file/upload").multipart(form)).await
    }

    /// Read `path` from disk and upload it under its own file name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the file cannot be read.
    pub async fn upload_path(&self, path: &Path, create_no: &str, create_name: &str) -> Result<UploadedFile, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Storage(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.upload(&file_name, bytes, create_no, create_name).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list(&self, query: &FileListQuery) -> Result<FileList, ApiError> {
        self.client.fetch(ApiRequest::post("/file/queryFileList").json(query)?).await
    }

    /// Same as [`FilesApi::list`] without user notifications, for polling.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn list_quiet(&self, query: &FileListQuery) -> Result<FileList, ApiError> {
        self.client.fetch(ApiRequest::post("/file/queryFileList").json(query)?.quiet()).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete(&self, file_id: i64) -> Result<(), ApiError> {
        let body = serde_json::json!({ "file_id": file_id });
        self.client.execute(ApiRequest::post("/file/fileDelete").json(&body)?).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn rename(&self, file_id: i64, file_name: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "file_id": file_id, "file_name": file_name });
        self.client.execute(ApiRequest::post("/file/reFilename").json(&body)?).await?;
        Ok(())
    }

    /// Queue a failed or stale file for parsing again.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn re_analysis(&self, file_id: i64) -> Result<(), ApiError> {
        let body = serde_json::json!({ "file_id": file_id });
        self.client.execute(ApiRequest::post("/file/reAnalysis").json(&body)?).await?;
        Ok(())
    }

    /// Parsed title outline of a file, used as a template.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::fetch`].
    pub async fn select_template_title(&self, file_id: i64) -> Result<Value, ApiError> {
        let body = serde_json::json!({ "file_id": file_id });
        self.client.fetch(ApiRequest::post("/file/selectTemplateTitle").json(&body)?).await
    }
}
