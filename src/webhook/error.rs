//! Webhook-specific error types.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Webhook errors
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The client was built without a webhook configuration
    #[error("Webhook is not configured for this client")]
    NotConfigured,

    /// The path cannot be used as a route
    #[error("Invalid webhook path: {0}")]
    InvalidPath(String),

    /// The listener could not bind its address
    #[error("Failed to bind webhook listener to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request carried no signature header
    #[error("Missing webhook signature header")]
    MissingSignature,

    /// Signature does not match the body
    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    /// Body is not a valid update
    #[error("Malformed update body: {0}")]
    MalformedBody(String),

    /// Router built outside a Tokio runtime
    #[error("Webhook router requires a running Tokio runtime")]
    NoRuntime,

    /// Dispatch queue capacity must be at least one
    #[error("Webhook queue capacity must be at least 1")]
    InvalidQueueCapacity,

    /// Dispatch queue is full
    #[error("Update queue is full")]
    QueueFull,

    /// Update dispatcher task has stopped
    #[error("Update dispatcher is not running")]
    DispatcherClosed,
}

impl WebhookError {
    /// HTTP status returned to the sender for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::MalformedBody(err.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::TrySendError<T>> for WebhookError {
    fn from(err: tokio::sync::mpsc::error::TrySendError<T>) -> Self {
        match err {
            tokio::sync::mpsc::error::TrySendError::Full(_) => WebhookError::QueueFull,
            tokio::sync::mpsc::error::TrySendError::Closed(_) => WebhookError::DispatcherClosed,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self, "Rejected webhook request");
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for webhook operations
pub type WebhookResult<T> = Result<T, WebhookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebhookError::SignatureMismatch.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebhookError::QueueFull.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebhookError::MalformedBody("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(WebhookError::from(err), WebhookError::MalformedBody(_)));
    }

    #[test]
    fn test_bind_error_display() {
        let err = WebhookError::Bind {
            addr: "127.0.0.1:3000".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:3000"));
    }
}
