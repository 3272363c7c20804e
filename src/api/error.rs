//! API error types for the Crypto Pay client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// API-specific error type for the Crypto Pay client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP/network error from reqwest (connect failure, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with `ok: false`
    #[error("API error: {0}")]
    Api(ErrorResponse),

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid parameter provided (rejected before any request is sent)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Non-success HTTP status without a readable envelope
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

impl ApiError {
    /// The vendor error, if the API answered with `ok: false`.
    pub fn api_error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Api(response) => Some(response),
            _ => None,
        }
    }

    /// Whether this is a transport-level failure (safe to retry a `transfer`
    /// with the same `spend_id`).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialize(err.to_string())
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error object returned by the API inside an `ok: false` envelope.
///
/// Usually `{"code": 400, "name": "INVOICE_NOT_FOUND"}`; any extra fields are
/// kept in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Numeric error code (mirrors the HTTP status)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Machine-readable error name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Any other fields the API included
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ErrorResponse {
    /// Get the error name, falling back to the code.
    pub fn get_message(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.code.map(|c| format!("error code {}", c)))
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{}", self.get_message()),
        }
    }
}

/// Raw response envelope: `{ok, result}` or `{ok, error}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorResponse>,
}

impl ApiEnvelope {
    /// Unwrap the envelope into the `result` payload or an [`ApiError::Api`].
    pub fn into_result(self) -> ApiResult<Value> {
        if self.ok {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            Err(ApiError::Api(self.error.unwrap_or_default()))
        }
    }
}
