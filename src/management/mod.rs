//! # Management API
//!
//! Interface to the Auth0 Management API for the resources this crate manages.
//!
//! Controllers only talk to the API through the [`LogStreamApi`] and [`HookApi`]
//! traits. [`ManagementClient`] is the REST implementation; tests substitute an
//! in-memory one.

use async_trait::async_trait;
use thiserror::Error;

pub mod client;
pub mod models;

pub use client::ManagementClient;
pub use models::{
    DatadogSink, EventBridgeSink, EventGridSink, Hook, HookSecrets, HttpContentFormat,
    HttpSink, LogStream, LogStreamStatus, LogStreamType, SecretKeySet, Sink, SplunkSink,
    TriggerId, UnknownVariant,
};

/// HTTP status the API uses for missing resources
pub const STATUS_NOT_FOUND: u16 = 404;

/// Errors returned by the Management API or while talking to it
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The API answered with a non-success status
    #[error("management API error {status} {error}: {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
        error_code: Option<String>,
    },
    /// The request never produced a response
    #[error("management API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body could not be decoded
    #[error("failed to decode management API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ManagementError {
    /// Build a 404 error, as the API reports it
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        ManagementError::Api {
            status: STATUS_NOT_FOUND,
            error: "Not Found".to_string(),
            message: message.into(),
            error_code: Some("inexistent_resource".to_string()),
        }
    }

    /// HTTP status of the failure, if the API produced one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ManagementError::Api { status, .. } => Some(*status),
            ManagementError::Transport(e) => e.status().map(|s| s.as_u16()),
            ManagementError::Decode(_) => None,
        }
    }

    /// Whether the API reported the resource as missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(STATUS_NOT_FOUND)
    }
}

/// Result type of Management API calls
pub type ApiResult<T> = std::result::Result<T, ManagementError>;

/// Log stream endpoints
#[async_trait]
pub trait LogStreamApi: Send + Sync {
    /// Create a log stream; returns the stored stream including its ID
    async fn create_log_stream(&self, log_stream: &LogStream) -> ApiResult<LogStream>;

    /// Read a log stream by ID
    async fn read_log_stream(&self, id: &str) -> ApiResult<LogStream>;

    /// Update the fields present in `log_stream`
    async fn update_log_stream(&self, id: &str, log_stream: &LogStream) -> ApiResult<LogStream>;

    /// Delete a log stream
    async fn delete_log_stream(&self, id: &str) -> ApiResult<()>;
}

/// Hook and hook secret endpoints
#[async_trait]
pub trait HookApi: Send + Sync {
    /// Create a hook; returns the stored hook including its ID
    async fn create_hook(&self, hook: &Hook) -> ApiResult<Hook>;

    /// Read a hook by ID
    async fn read_hook(&self, id: &str) -> ApiResult<Hook>;

    /// Update the fields present in `hook`
    async fn update_hook(&self, id: &str, hook: &Hook) -> ApiResult<Hook>;

    /// Delete a hook
    async fn delete_hook(&self, id: &str) -> ApiResult<()>;

    /// Names of the secrets stored on a hook
    async fn hook_secrets(&self, id: &str) -> ApiResult<SecretKeySet>;

    /// Add secrets that do not exist yet
    async fn create_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()>;

    /// Overwrite the values of existing secrets
    async fn update_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()>;

    /// Remove secrets by name
    async fn remove_hook_secrets(&self, id: &str, names: &[String]) -> ApiResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = ManagementError::not_found("The log stream does not exist.");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        let err = ManagementError::Api {
            status: 429,
            error: "Too Many Requests".to_string(),
            message: "Global limit has been reached".to_string(),
            error_code: None,
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_display() {
        let err = ManagementError::Api {
            status: 400,
            error: "Bad Request".to_string(),
            message: "Payload validation error".to_string(),
            error_code: Some("invalid_body".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "management API error 400 Bad Request: Payload validation error"
        );
    }
}
