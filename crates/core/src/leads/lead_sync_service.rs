//! Aggregation engine: fetch, join, classify, summarize.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use super::lead_classifier::classify;
use super::leads_model::{
    Appointment, Contact, Form, FormSummary, Lead, LeadAppointment, LeadOpportunity,
    LeadsByStatus, Opportunity, RawCounts, SyncReport, SyncSummary,
};
use crate::crm::{CrmApi, CrmResource};
use crate::error::Result;

/// Runs lead syncs against a CRM location.
pub struct LeadSyncService {
    crm: Arc<dyn CrmApi>,
}

impl LeadSyncService {
    pub fn new(crm: Arc<dyn CrmApi>) -> Self {
        Self { crm }
    }

    /// Fetch all four collections with a fresh token and build the report.
    ///
    /// The fetches run concurrently and the first failure aborts the rest;
    /// no partial report is ever produced.
    pub async fn sync_leads(&self) -> Result<SyncReport> {
        let token = self
            .crm
            .obtain_access_token()
            .await
            .map_err(|e| e.into_upstream(CrmResource::AccessToken))?;

        let (contacts, opportunities, appointments, forms) = tokio::try_join!(
            self.crm.fetch_contacts(&token),
            self.crm.fetch_opportunities(&token),
            self.crm.fetch_appointments(&token),
            self.crm.fetch_forms(&token),
        )
        .map_err(|e| {
            warn!("Lead sync aborted: {}", e);
            e
        })?;

        debug!(
            "Fetched {} contacts, {} opportunities, {} appointments, {} forms",
            contacts.len(),
            opportunities.len(),
            appointments.len(),
            forms.len()
        );

        let report = build_report(&contacts, &opportunities, &appointments, &forms);
        info!(
            "Lead sync built {} leads (hot={}, warm={}, cold={})",
            report.summary.total_leads,
            report.summary.leads_by_status.hot,
            report.summary.leads_by_status.warm,
            report.summary.leads_by_status.cold
        );
        Ok(report)
    }

    /// Fetch and project the location's forms.
    pub async fn list_forms(&self) -> Result<Vec<FormSummary>> {
        let token = self.crm.obtain_access_token().await?;
        let forms = self.crm.fetch_forms(&token).await?;
        Ok(forms.iter().map(FormSummary::from).collect())
    }
}

fn group_by_owner<'a, T>(
    items: &'a [T],
    owner: impl Fn(&'a T) -> Option<&'a str>,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut grouped: HashMap<&str, Vec<&T>> = HashMap::new();
    for item in items {
        if let Some(id) = owner(item) {
            grouped.entry(id).or_default().push(item);
        }
    }
    grouped
}

/// Join, classify, and summarize fetched collections.
///
/// Opportunities and appointments are attached to the contact whose id equals
/// their owner key; records without a matching contact are only counted.
pub fn build_report(
    contacts: &[Contact],
    opportunities: &[Opportunity],
    appointments: &[Appointment],
    forms: &[Form],
) -> SyncReport {
    let opportunities_by_contact = group_by_owner(opportunities, Opportunity::owner_id);
    let appointments_by_contact = group_by_owner(appointments, Appointment::owner_id);

    let mut leads_by_status = LeadsByStatus::default();
    let leads: Vec<Lead> = contacts
        .iter()
        .map(|contact| {
            let status = classify(contact);
            leads_by_status.record(status);

            let opportunities = opportunities_by_contact
                .get(contact.id.as_str())
                .map(|items| items.iter().map(|o| LeadOpportunity::from(*o)).collect())
                .unwrap_or_default();
            let appointments = appointments_by_contact
                .get(contact.id.as_str())
                .map(|items| items.iter().map(|a| LeadAppointment::from(*a)).collect())
                .unwrap_or_default();

            Lead {
                id: contact.id.clone(),
                name: contact.display_name(),
                email: contact.email.clone(),
                phone: contact.phone.clone(),
                source: contact.source.clone(),
                status,
                last_activity: contact.date_updated.clone(),
                tags: contact.tags.clone(),
                custom_fields: contact.custom_fields.clone(),
                opportunities,
                appointments,
            }
        })
        .collect();

    SyncReport {
        summary: SyncSummary {
            total_leads: leads.len(),
            leads_by_status,
            total_opportunities: opportunities.len(),
            total_appointments: appointments.len(),
            forms: forms.iter().map(FormSummary::from).collect(),
        },
        raw: RawCounts {
            contacts: contacts.len(),
            opportunities: opportunities.len(),
            appointments: appointments.len(),
            forms: forms.len(),
        },
        leads,
    }
}
