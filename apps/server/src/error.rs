//! HTTP error envelopes.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Result type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// CRM call failed; `details` carries the upstream body when there was one
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    #[error("Invalid webhook data")]
    InvalidWebhook,

    #[error("{0}")]
    Internal(String),
}

impl From<leadsync_core::Error> for ApiError {
    fn from(err: leadsync_core::Error) -> Self {
        use leadsync_core::Error as CoreError;
        match err {
            CoreError::Auth { .. } | CoreError::Upstream { .. } => {
                let details = err.details().map(str::to_string);
                Self::Upstream {
                    message: err.to_string(),
                    details,
                }
            }
            CoreError::MalformedWebhook(_) => Self::InvalidWebhook,
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Upstream { message, details } => {
                let mut body = json!({ "success": false, "error": message });
                if let Some(details) = details {
                    body["details"] = upstream_details(details);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::InvalidWebhook => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid webhook data" })),
            )
                .into_response(),
            ApiError::Internal(message) => internal_error(message),
        }
    }
}

/// Upstream bodies are usually JSON; embed them as-is when they parse.
fn upstream_details(details: String) -> serde_json::Value {
    serde_json::from_str(&details).unwrap_or(serde_json::Value::String(details))
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": "Internal server error",
            "message": message,
        })),
    )
        .into_response()
}

/// Converts a handler panic into the internal error envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Unhandled request failure: {}", message);
    internal_error(message)
}
