//! Authenticated HTTP wrapper over `reqwest`.
//!
//! One generic call path for every endpoint: join the path onto the API
//! base, attach the bearer token unless the path is on the public
//! allow-list, send, decode the envelope, and report failures through the
//! notifier before returning them.
//!
//! The token is a parameter of [`HttpClient::execute`]. The wrapper never
//! reads session state on its own.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::{self, Envelope};
use super::notify::{NoticeLevel, Notifier};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Paths that must never carry an `Authorization` header.
pub const PUBLIC_PATHS: [&str; 3] = ["/login", "/register", "/register-with-invite"];

/// Notice shown for failures that never reached the server.
pub const NETWORK_ERROR_NOTICE: &str = "network error or service unavailable";

/// Whether a request to `path` should carry the bearer token.
#[must_use]
pub fn requires_auth(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path).trim_end_matches('/');
    !PUBLIC_PATHS.iter().any(|public| path.ends_with(public))
}

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// A request relative to the API base, built by the `api` modules.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Suppress user notifications for this call; errors are still returned.
    pub quiet: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty, quiet: false }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    notifier: Arc<dyn Notifier>,
}

impl HttpClient {
    /// Build a wrapper for the configured API host.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the host is not an http(s)
    /// URL, or [`ApiError::HttpClientBuild`] if `reqwest` rejects the config.
    pub fn new(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let base_url = config.api_base();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, notifier })
    }

    /// API base every request path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path, for endpoints consumed outside this wrapper
    /// (streaming generation used by the editor).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Send a request and decode the response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response arrives, and the
    /// envelope errors described in [`envelope::interpret`] otherwise. Each
    /// error has already been reported to the notifier unless the request
    /// is quiet.
    pub async fn execute(&self, request: ApiRequest, token: Option<&str>) -> Result<Envelope, ApiError> {
        let ApiRequest { method, path, query, body, quiet } = request;
        let url = self.url(&path);

        let mut builder = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if requires_auth(&path) {
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                builder = builder.bearer_auth(token);
            }
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        debug!(%method, %path, "api request");
        let result = match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(text) => envelope::interpret(status, &text),
                    Err(e) => Err(ApiError::Network(e.to_string())),
                }
            }
            Err(e) => Err(ApiError::Network(e.to_string())),
        };

        if let Err(err) = &result {
            warn!(%method, %path, error = %err, "api request failed");
            if !quiet {
                self.report(err);
            }
        }
        result
    }

    /// Send a request and decode its `data` member into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::execute`], plus [`ApiError::Decode`] when the
    /// data does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest, token: Option<&str>) -> Result<T, ApiError> {
        let quiet = request.quiet;
        let result = self.execute(request, token).await?.into_data();
        if let Err(err) = &result {
            if !quiet {
                self.report(err);
            }
        }
        result
    }

    fn report(&self, err: &ApiError) {
        match err {
            ApiError::Network(_) => self.notifier.notify(NoticeLevel::Error, NETWORK_ERROR_NOTICE),
            other => self.notifier.notify(NoticeLevel::Error, &other.to_string()),
        }
    }
}
