//! Error type shared by every client operation.

/// Errors produced by API calls, persistence, and session handling.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success HTTP status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx but the envelope `code` was not 200.
    #[error("{message}")]
    Application { code: i64, message: String },

    /// A request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The response body could not be decoded into the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The configured API host is not a usable URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Durable client storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The operation needs a logged-in session and there is none.
    #[error("not logged in")]
    MissingSession,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Whether retrying the same call later could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { status: 429 | 500..=599, .. })
    }

    /// Envelope or HTTP code that signals an expired or invalid session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. } | Self::Application { code: 401, .. })
    }
}
