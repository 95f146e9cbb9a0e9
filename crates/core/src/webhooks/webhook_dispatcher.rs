use log::{debug, info};

use super::webhook_model::{WebhookEvent, WebhookEventKind};

/// What happened to a delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDispatch {
    /// Routed to the handler for a recognized kind.
    Handled(WebhookEventKind),
    /// Accepted, but no handler is registered for this type yet.
    NoHandlerRegistered(Option<String>),
}

/// Route a webhook event to its handler.
///
/// Recognized kinds are acknowledged without side effects for now; sync is
/// pull-based through the lead sync endpoint.
pub fn dispatch(event: &WebhookEvent) -> WebhookDispatch {
    match event {
        WebhookEvent::Recognized { kind, .. } => {
            let subject = event.subject_id().unwrap_or("-");
            match kind {
                WebhookEventKind::ContactCreate | WebhookEventKind::ContactUpdate => {
                    info!("Webhook {} for contact {}", kind.as_str(), subject);
                }
                WebhookEventKind::OpportunityCreate | WebhookEventKind::OpportunityUpdate => {
                    info!("Webhook {} for opportunity {}", kind.as_str(), subject);
                }
                WebhookEventKind::AppointmentCreate | WebhookEventKind::AppointmentUpdate => {
                    info!("Webhook {} for appointment {}", kind.as_str(), subject);
                }
            }
            WebhookDispatch::Handled(*kind)
        }
        WebhookEvent::Unrecognized { event_type, .. } => {
            debug!(
                "No webhook handler registered for type {}",
                event_type.as_deref().unwrap_or("<missing>")
            );
            WebhookDispatch::NoHandlerRegistered(event_type.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_events_are_handled() {
        let event =
            WebhookEvent::parse(br#"{"type":"appointment.update","data":{"id":"a1"}}"#).unwrap();
        assert_eq!(
            dispatch(&event),
            WebhookDispatch::Handled(WebhookEventKind::AppointmentUpdate)
        );
    }

    #[test]
    fn unknown_events_have_no_handler() {
        let event = WebhookEvent::parse(br#"{"type":"note.create"}"#).unwrap();
        assert_eq!(
            dispatch(&event),
            WebhookDispatch::NoHandlerRegistered(Some("note.create".to_string()))
        );
    }
}
