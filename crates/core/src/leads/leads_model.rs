//! CRM resource snapshots and the lead/summary shapes derived from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::serde_defaults::null_as_default;

/// Key/value custom field attached to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Contact as returned by the CRM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub date_updated: Option<String>,
    /// Timestamp of the last message exchanged with the contact.
    pub last_message_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
}

impl Contact {
    /// "First Last", trimmed; missing parts count as empty.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Reference to the owning contact, as nested inside opportunity payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub monetary_value: Option<Decimal>,
    pub pipeline_stage_id: Option<String>,
    pub contact: Option<ContactRef>,
    pub contact_id: Option<String>,
}

impl Opportunity {
    /// Owning contact id; the nested `contact.id` wins over a flat `contactId`.
    pub fn owner_id(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .and_then(|c| c.id.as_deref())
            .or(self.contact_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub status: Option<String>,
    pub appointment_status: Option<String>,
    pub contact_id: Option<String>,
}

impl Appointment {
    pub fn owner_id(&self) -> Option<&str> {
        self.contact_id.as_deref()
    }

    /// `status`, falling back to the calendar's `appointmentStatus`.
    pub fn effective_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or(self.appointment_status.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: Option<String>,
    pub submissions: Option<u64>,
}

/// Lead temperature, ordered hottest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadOpportunity {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub value: Option<Decimal>,
    pub stage: Option<String>,
}

impl From<&Opportunity> for LeadOpportunity {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            id: opportunity.id.clone(),
            name: opportunity.name.clone(),
            status: opportunity.status.clone(),
            value: opportunity.monetary_value,
            stage: opportunity.pipeline_stage_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAppointment {
    pub id: String,
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub status: Option<String>,
}

impl From<&Appointment> for LeadAppointment {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.clone(),
            title: appointment.title.clone(),
            start_time: appointment.start_time.clone(),
            status: appointment.effective_status().map(str::to_string),
        }
    }
}

/// A contact enriched with its classification and joined records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: LeadStatus,
    pub last_activity: Option<String>,
    pub tags: Vec<String>,
    pub custom_fields: Vec<CustomField>,
    pub opportunities: Vec<LeadOpportunity>,
    pub appointments: Vec<LeadAppointment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeadsByStatus {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl LeadsByStatus {
    pub fn record(&mut self, status: LeadStatus) {
        match status {
            LeadStatus::Hot => self.hot += 1,
            LeadStatus::Warm => self.warm += 1,
            LeadStatus::Cold => self.cold += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.hot + self.warm + self.cold
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub id: String,
    pub name: Option<String>,
    pub submissions: u64,
}

impl From<&Form> for FormSummary {
    fn from(form: &Form) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name.clone(),
            submissions: form.submissions.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub total_leads: usize,
    pub leads_by_status: LeadsByStatus,
    pub total_opportunities: usize,
    pub total_appointments: usize,
    pub forms: Vec<FormSummary>,
}

/// Sizes of the collections fetched from the CRM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RawCounts {
    pub contacts: usize,
    pub opportunities: usize,
    pub appointments: usize,
    pub forms: usize,
}

/// Output of one sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub leads: Vec<Lead>,
    pub summary: SyncSummary,
    pub raw: RawCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn contact_defaults_null_collections() {
        let json = r#"{"id":"c1","firstName":"Ada","tags":null,"customFields":null}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.id, "c1");
        assert!(contact.tags.is_empty());
        assert!(contact.custom_fields.is_empty());
        assert!(contact.email.is_none());
    }

    #[test]
    fn records_without_id_do_not_fail_the_collection() {
        let json = r#"[{"id":"c1","tags":["vip"]},{"firstName":"NoId"},{"id":null,"customFields":[{"value":"x"}]}]"#;
        let contacts: Vec<Contact> = serde_json::from_str(json).unwrap();
        assert_eq!(contacts.len(), 3);
        assert_eq!(contacts[0].id, "c1");
        assert_eq!(contacts[1].id, "");
        assert_eq!(contacts[1].first_name.as_deref(), Some("NoId"));
        assert_eq!(contacts[2].custom_fields[0].id, "");

        let opportunities: Vec<Opportunity> =
            serde_json::from_str(r#"[{"name":"Deal","contactId":"c1"}]"#).unwrap();
        assert_eq!(opportunities[0].id, "");
        let appointments: Vec<Appointment> =
            serde_json::from_str(r#"[{"id":null,"contactId":"c1"}]"#).unwrap();
        assert_eq!(appointments[0].id, "");
        let forms: Vec<Form> = serde_json::from_str(r#"[{"name":"Signup"}]"#).unwrap();
        assert_eq!(forms[0].id, "");
    }

    #[test]
    fn display_name_trims_missing_parts() {
        let mut contact = Contact {
            id: "c1".to_string(),
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.display_name(), "Ada");

        contact.first_name = None;
        contact.last_name = Some("Lovelace".to_string());
        assert_eq!(contact.display_name(), "Lovelace");

        contact.last_name = None;
        assert_eq!(contact.display_name(), "");
    }

    #[test]
    fn opportunity_owner_prefers_nested_contact() {
        let json = r#"{"id":"o1","contact":{"id":"c1"},"contactId":"c2","monetaryValue":500}"#;
        let opportunity: Opportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opportunity.owner_id(), Some("c1"));
        assert_eq!(opportunity.monetary_value, Some(dec!(500)));

        let flat: Opportunity = serde_json::from_str(r#"{"id":"o2","contactId":"c2"}"#).unwrap();
        assert_eq!(flat.owner_id(), Some("c2"));
    }

    #[test]
    fn appointment_status_falls_back_to_calendar_status() {
        let json = r#"{"id":"a1","appointmentStatus":"confirmed","contactId":"c1"}"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(
            LeadAppointment::from(&appointment).status.as_deref(),
            Some("confirmed")
        );
    }

    #[test]
    fn form_summary_defaults_submissions() {
        let form: Form = serde_json::from_str(r#"{"id":"f1","name":"Signup"}"#).unwrap();
        assert_eq!(FormSummary::from(&form).submissions, 0);
    }

    #[test]
    fn lead_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LeadStatus::Warm).unwrap(), "\"warm\"");
    }
}
