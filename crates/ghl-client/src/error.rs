//! Error types for the GoHighLevel client.

use leadsync_core::{CrmResource, Error as CoreError};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, GhlError>;

/// Errors that can occur while calling the LeadConnector API.
#[derive(Debug, Error)]
pub enum GhlError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response; `message` holds the response body verbatim
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid request (bad header value, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GhlError {
    /// Create an API error from status and body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn summary(&self) -> String {
        match self {
            Self::Api { status, .. } => format!("Request failed with status code {}", status),
            other => other.to_string(),
        }
    }

    fn body(self) -> Option<String> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Convert a token exchange failure into a domain auth error.
    pub fn into_auth_error(self) -> CoreError {
        let message = self.summary();
        CoreError::auth(message, self.body())
    }

    /// Convert a resource read failure into a domain upstream error.
    pub fn into_upstream_error(self, resource: CrmResource) -> CoreError {
        let message = self.summary();
        CoreError::upstream(resource, message, self.body())
    }
}
