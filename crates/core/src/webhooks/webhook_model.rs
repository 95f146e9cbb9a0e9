use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Webhook event types this service recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventKind {
    ContactCreate,
    ContactUpdate,
    OpportunityCreate,
    OpportunityUpdate,
    AppointmentCreate,
    AppointmentUpdate,
}

impl WebhookEventKind {
    /// Match an event type string. Separators and case are ignored, so
    /// `contact.create`, `contact_create` and `ContactCreate` are equivalent.
    pub fn from_type(event_type: &str) -> Option<Self> {
        let normalized: String = event_type
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "contactcreate" => Some(Self::ContactCreate),
            "contactupdate" => Some(Self::ContactUpdate),
            "opportunitycreate" => Some(Self::OpportunityCreate),
            "opportunityupdate" => Some(Self::OpportunityUpdate),
            "appointmentcreate" => Some(Self::AppointmentCreate),
            "appointmentupdate" => Some(Self::AppointmentUpdate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContactCreate => "contact.create",
            Self::ContactUpdate => "contact.update",
            Self::OpportunityCreate => "opportunity.create",
            Self::OpportunityUpdate => "opportunity.update",
            Self::AppointmentCreate => "appointment.create",
            Self::AppointmentUpdate => "appointment.update",
        }
    }
}

/// A parsed webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    Recognized {
        kind: WebhookEventKind,
        payload: Value,
    },
    /// Valid JSON whose type has no handler.
    Unrecognized {
        event_type: Option<String>,
        payload: Value,
    },
}

impl WebhookEvent {
    /// Parse a raw request body. Any valid JSON is accepted; only bodies that
    /// fail to parse are rejected.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let payload: Value =
            serde_json::from_slice(body).map_err(|e| Error::MalformedWebhook(e.to_string()))?;

        let event_type = payload
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(match event_type.as_deref().and_then(WebhookEventKind::from_type) {
            Some(kind) => Self::Recognized { kind, payload },
            None => Self::Unrecognized {
                event_type,
                payload,
            },
        })
    }

    pub fn payload(&self) -> &Value {
        match self {
            Self::Recognized { payload, .. } | Self::Unrecognized { payload, .. } => payload,
        }
    }

    /// `data.id` of the affected record, when present.
    pub fn subject_id(&self) -> Option<&str> {
        self.payload()
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
    }
}
