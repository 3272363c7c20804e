//! Webhook listener configuration.

use std::net::{IpAddr, Ipv4Addr};

use crate::network::DEFAULT_WEBHOOK_PORT;
use crate::webhook::error::{WebhookError, WebhookResult};

/// Updates that may wait for dispatch before deliveries are refused.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Where the webhook listener accepts updates.
///
/// When `path` is unset the app token is used as the path, so the endpoint
/// URL is not guessable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Route path, with or without a leading `/`
    pub path: Option<String>,
    /// TCP port (default 3000)
    pub port: u16,
    /// Bind address (default `0.0.0.0`)
    pub host: IpAddr,
    /// Updates queued for dispatch before deliveries get `500` (default 1024)
    pub queue_capacity: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: None,
            port: DEFAULT_WEBHOOK_PORT,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl WebhookConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Reject an empty queue and paths the router would treat as captures or wildcards.
    pub fn validate(&self) -> WebhookResult<()> {
        if self.queue_capacity == 0 {
            return Err(WebhookError::InvalidQueueCapacity);
        }
        match &self.path {
            Some(path) => validate_path(path),
            None => Ok(()),
        }
    }

    /// Route for the listener, always starting with `/`.
    pub(crate) fn route(&self, token: &str) -> String {
        let path = self.path.as_deref().unwrap_or(token);
        format!("/{}", path.trim_start_matches('/'))
    }
}

pub(crate) fn validate_path(path: &str) -> WebhookResult<()> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(WebhookError::InvalidPath("path cannot be empty".to_string()));
    }
    if trimmed.contains(['{', '}', '?', '#']) || trimmed.chars().any(char::is_whitespace) {
        return Err(WebhookError::InvalidPath(format!(
            "path contains reserved characters: {}",
            path
        )));
    }
    if trimmed
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(WebhookError::InvalidPath(format!(
            "path segments cannot start with ':' or '*': {}",
            path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(config.path.is_none());
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_route_defaults_to_token() {
        let config = WebhookConfig::new();
        assert_eq!(config.route("12345:AAabc"), "/12345:AAabc");

        let config = WebhookConfig::new().with_path("/hooks/crypto");
        assert_eq!(config.route("12345:AAabc"), "/hooks/crypto");

        let config = WebhookConfig::new().with_path("hooks");
        assert_eq!(config.route("12345:AAabc"), "/hooks");
    }

    #[test]
    fn test_validate_path() {
        assert!(WebhookConfig::new().with_path("/hooks/crypto").validate().is_ok());
        assert!(WebhookConfig::new().with_path("/").validate().is_err());
        assert!(WebhookConfig::new().with_path("/{id}").validate().is_err());
        assert!(WebhookConfig::new().with_path("/:id").validate().is_err());
        assert!(WebhookConfig::new().with_path("/a b").validate().is_err());
        assert!(matches!(
            WebhookConfig::new().with_queue_capacity(0).validate(),
            Err(WebhookError::InvalidQueueCapacity)
        ));
    }
}
