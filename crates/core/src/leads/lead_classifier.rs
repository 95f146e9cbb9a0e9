//! Lead temperature rules.

use super::leads_model::{Contact, LeadStatus};

const HOT_TAGS: [&str; 4] = ["vip", "enterprise", "priority", "hot"];
const WARM_TAGS: [&str; 3] = ["interested", "demo", "trial"];
const HOT_EMAIL_MARKERS: [&str; 3] = ["ceo", "founder", "director"];

fn has_tag(contact: &Contact, wanted: &[&str]) -> bool {
    contact.tags.iter().any(|tag| {
        let tag = tag.trim();
        wanted.iter().any(|w| tag.eq_ignore_ascii_case(w))
    })
}

fn has_executive_email(contact: &Contact) -> bool {
    let Some(email) = contact.email.as_deref() else {
        return false;
    };
    let email = email.to_lowercase();
    HOT_EMAIL_MARKERS.iter().any(|marker| email.contains(marker))
}

fn has_recent_message(contact: &Contact) -> bool {
    contact
        .last_message_date
        .as_deref()
        .is_some_and(|date| !date.is_empty())
}

/// Classify a contact. Hot rules are checked before warm rules; the first
/// match wins and anything else is cold.
pub fn classify(contact: &Contact) -> LeadStatus {
    if has_tag(contact, &HOT_TAGS) || has_executive_email(contact) {
        return LeadStatus::Hot;
    }
    if has_recent_message(contact) || has_tag(contact, &WARM_TAGS) {
        return LeadStatus::Warm;
    }
    LeadStatus::Cold
}
