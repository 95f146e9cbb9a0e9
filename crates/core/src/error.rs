//! Error types for the lead sync domain.

use thiserror::Error;

use crate::crm::CrmResource;

/// Result type alias for lead sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the CRM or handling its events.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential exchange against the CRM OAuth endpoint failed
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        details: Option<String>,
    },

    /// A CRM resource read failed
    #[error("Failed to fetch {resource}: {message}")]
    Upstream {
        resource: CrmResource,
        message: String,
        details: Option<String>,
    },

    /// Inbound webhook body could not be parsed
    #[error("Invalid webhook data: {0}")]
    MalformedWebhook(String),

    /// Unexpected local failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an auth error with an optional upstream body
    pub fn auth(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Auth {
            message: message.into(),
            details,
        }
    }

    /// Create an upstream error for a resource read
    pub fn upstream(
        resource: CrmResource,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        Self::Upstream {
            resource,
            message: message.into(),
            details,
        }
    }

    /// Upstream response body, when the failure carried one.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Auth { details, .. } | Self::Upstream { details, .. } => details.as_deref(),
            Self::MalformedWebhook(_) | Self::Internal(_) => None,
        }
    }

    /// Re-tag a token failure as a failed read of the given resource.
    ///
    /// The aggregation engine reports every failure, including credential
    /// exchange, as an upstream error.
    pub fn into_upstream(self, resource: CrmResource) -> Self {
        match self {
            Self::Auth { message, details } => Self::Upstream {
                resource,
                message: format!("Authentication failed: {}", message),
                details,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_becomes_upstream_with_details() {
        let err = Error::auth("HTTP 401", Some("{\"error\":\"invalid_client\"}".to_string()))
            .into_upstream(CrmResource::AccessToken);

        match &err {
            Error::Upstream {
                resource, message, ..
            } => {
                assert_eq!(*resource, CrmResource::AccessToken);
                assert!(message.contains("HTTP 401"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
        assert_eq!(err.details(), Some("{\"error\":\"invalid_client\"}"));
    }

    #[test]
    fn upstream_error_is_left_untouched() {
        let err = Error::upstream(CrmResource::Forms, "HTTP 500", None)
            .into_upstream(CrmResource::AccessToken);
        assert_eq!(err.to_string(), "Failed to fetch forms: HTTP 500");
        assert!(err.details().is_none());
    }
}
