//! In-memory CRM for engine and route tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::crm::{AccessToken, CrmApi, CrmResource};
use crate::error::{Error, Result};
use crate::leads::{Appointment, Contact, Form, Opportunity};

/// Serves fixed collections; optionally fails one resource with a 500-style
/// upstream error. Clones share the token request counter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrm {
    pub contacts: Vec<Contact>,
    pub opportunities: Vec<Opportunity>,
    pub appointments: Vec<Appointment>,
    pub forms: Vec<Form>,
    pub failing: Option<CrmResource>,
    /// Shared by clones; read through [`InMemoryCrm::token_requests`].
    pub token_counter: Arc<AtomicUsize>,
}

impl InMemoryCrm {
    pub fn failing_on(mut self, resource: CrmResource) -> Self {
        self.failing = Some(resource);
        self
    }

    pub fn token_requests(&self) -> usize {
        self.token_counter.load(Ordering::SeqCst)
    }

    fn check(&self, resource: CrmResource) -> Result<()> {
        if self.failing != Some(resource) {
            return Ok(());
        }
        let body = format!("{{\"message\":\"{} unavailable\"}}", resource);
        Err(match resource {
            CrmResource::AccessToken => Error::auth("HTTP 401", Some(body)),
            other => Error::upstream(other, "HTTP 500", Some(body)),
        })
    }
}

#[async_trait]
impl CrmApi for InMemoryCrm {
    async fn obtain_access_token(&self) -> Result<AccessToken> {
        self.token_counter.fetch_add(1, Ordering::SeqCst);
        self.check(CrmResource::AccessToken)?;
        Ok(AccessToken::new("test-token"))
    }

    async fn fetch_contacts(&self, _token: &AccessToken) -> Result<Vec<Contact>> {
        self.check(CrmResource::Contacts)?;
        Ok(self.contacts.clone())
    }

    async fn fetch_opportunities(&self, _token: &AccessToken) -> Result<Vec<Opportunity>> {
        self.check(CrmResource::Opportunities)?;
        Ok(self.opportunities.clone())
    }

    async fn fetch_appointments(&self, _token: &AccessToken) -> Result<Vec<Appointment>> {
        self.check(CrmResource::Appointments)?;
        Ok(self.appointments.clone())
    }

    async fn fetch_forms(&self, _token: &AccessToken) -> Result<Vec<Form>> {
        self.check(CrmResource::Forms)?;
        Ok(self.forms.clone())
    }
}
