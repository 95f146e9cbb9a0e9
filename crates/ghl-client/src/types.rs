//! Response envelopes for the LeadConnector API.

use leadsync_core::leads::{Appointment, Contact, Form, Opportunity};
use leadsync_core::utils::serde_defaults::null_as_default;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpportunitiesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub opportunities: Vec<Opportunity>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub forms: Vec<Form>,
}
