//! Contract between the aggregation engine and a CRM backend.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::leads::{Appointment, Contact, Form, Opportunity};

/// Bearer token returned by the CRM's client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Upstream resources the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrmResource {
    AccessToken,
    Contacts,
    Opportunities,
    Appointments,
    Forms,
}

impl CrmResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access token",
            Self::Contacts => "contacts",
            Self::Opportunities => "opportunities",
            Self::Appointments => "appointments",
            Self::Forms => "forms",
        }
    }
}

impl fmt::Display for CrmResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to one CRM location.
///
/// Implementations are scoped to a single location at construction time and
/// must not cache tokens: every call to [`CrmApi::obtain_access_token`]
/// performs a fresh credential exchange.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Exchange the configured client credentials for a bearer token.
    ///
    /// Fails with [`crate::Error::Auth`].
    async fn obtain_access_token(&self) -> Result<AccessToken>;

    async fn fetch_contacts(&self, token: &AccessToken) -> Result<Vec<Contact>>;

    async fn fetch_opportunities(&self, token: &AccessToken) -> Result<Vec<Opportunity>>;

    async fn fetch_appointments(&self, token: &AccessToken) -> Result<Vec<Appointment>>;

    async fn fetch_forms(&self, token: &AccessToken) -> Result<Vec<Form>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-value");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
        assert_eq!(token.as_str(), "secret-value");
    }
}
