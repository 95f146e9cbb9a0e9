//! GoHighLevel endpoints: lead sync, forms listing, and webhook intake.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use leadsync_core::leads::{FormSummary, SyncReport};
use leadsync_core::webhooks::{dispatch, WebhookEvent};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SyncResponse {
    success: bool,
    timestamp: String,
    data: SyncReport,
}

#[derive(Debug, Serialize)]
struct FormsResponse {
    success: bool,
    forms: Vec<FormSummary>,
}

#[derive(Debug, Serialize)]
struct WebhookAck {
    received: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn sync_leads(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncResponse>> {
    info!("[GHL] Starting lead sync");

    let report = state.lead_sync.sync_leads().await.map_err(|e| {
        error!("[GHL] Lead sync failed: {}", e);
        ApiError::from(e)
    })?;

    info!(
        "[GHL] Lead sync complete: {} leads, {} opportunities, {} appointments",
        report.summary.total_leads,
        report.summary.total_opportunities,
        report.summary.total_appointments
    );

    Ok(Json(SyncResponse {
        success: true,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        data: report,
    }))
}

async fn list_forms(State(state): State<Arc<AppState>>) -> ApiResult<Json<FormsResponse>> {
    let forms = state.lead_sync.list_forms().await.map_err(|e| {
        error!("[GHL] Forms fetch failed: {}", e);
        ApiError::from(e)
    })?;

    info!("[GHL] Fetched {} forms", forms.len());
    Ok(Json(FormsResponse {
        success: true,
        forms,
    }))
}

/// Accepts the raw body so malformed JSON gets the webhook error envelope
/// instead of the extractor's rejection.
async fn receive_webhook(body: Bytes) -> ApiResult<Json<WebhookAck>> {
    let event = WebhookEvent::parse(&body).map_err(|e| {
        warn!("[GHL] Rejected webhook: {}", e);
        ApiError::from(e)
    })?;

    dispatch(&event);
    Ok(Json(WebhookAck { received: true }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ghl/sync", post(sync_leads))
        .route("/api/ghl/forms", get(list_forms))
        .route("/api/ghl/webhook", post(receive_webhook))
}
