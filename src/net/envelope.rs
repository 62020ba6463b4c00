//! Response envelope decoding.
//!
//! The backend wraps every JSON response as `{ code, type, message, data }`
//! and signals success with `code == 200`, independent of the HTTP status.
//! Error responses raised by the framework instead carry `detail`; a few
//! proxies use `error` or `msg`. This module turns a raw status + body into
//! either an [`Envelope`] or the matching [`ApiError`].

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Envelope `code` value that marks a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// Body fields consulted, in order, for a human-readable error message.
const MESSAGE_FIELDS: [&str; 4] = ["message", "detail", "error", "msg"];

/// A decoded successful response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Envelope {
    /// Application code; `None` when the body carried no envelope.
    pub code: Option<i64>,
    /// Envelope `type`, usually `"success"`.
    pub kind: Option<String>,
    pub message: Option<String>,
    /// The `data` member, or the whole body when there was no envelope.
    pub data: Value,
}

impl Envelope {
    /// Decode `data` into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `data` does not match `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Interpret a raw HTTP response.
///
/// # Errors
///
/// - [`ApiError::Http`] for non-2xx statuses.
/// - [`ApiError::Application`] for 2xx bodies whose `code` is not 200.
/// - [`ApiError::Decode`] for 2xx bodies that are not JSON.
pub fn interpret(status: u16, body: &str) -> Result<Envelope, ApiError> {
    let success = (200..300).contains(&status);

    if body.trim().is_empty() {
        if success {
            return Ok(Envelope::default());
        }
        return Err(ApiError::Http { status, message: fallback_message(status) });
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if success => return Err(ApiError::Decode(e.to_string())),
        Err(_) => return Err(ApiError::Http { status, message: fallback_message(status) }),
    };

    if !success {
        return Err(ApiError::Http { status, message: error_message(&value, status) });
    }

    let Some(code) = value.get("code").and_then(Value::as_i64) else {
        return Ok(Envelope { code: None, kind: None, message: None, data: value });
    };
    if code != SUCCESS_CODE {
        return Err(ApiError::Application { code, message: error_message(&value, status) });
    }

    let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
    let message = value.get("message").and_then(Value::as_str).map(str::to_owned);
    let data = match value {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    Ok(Envelope { code: Some(code), kind, message, data })
}

/// Extract the user-facing message from an error body.
///
/// Checks `message`, `detail`, `error`, `msg` in that order and takes the
/// first non-empty string; falls back to `request error (<status>)`.
#[must_use]
pub fn error_message(body: &Value, status: u16) -> String {
    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| body.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map_or_else(|| fallback_message(status), str::to_owned)
}

fn fallback_message(status: u16) -> String {
    format!("request error ({status})")
}
