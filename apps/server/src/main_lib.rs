//! Application state and router assembly.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use leadsync_core::leads::LeadSyncService;
use leadsync_core::CrmApi;
use leadsync_ghl::{GhlClient, GhlCredentials};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::AppConfig;
use crate::error::handle_panic;

pub const SERVICE_NAME: &str = "leadsync-ghl-proxy";

pub struct AppState {
    pub config: AppConfig,
    pub lead_sync: LeadSyncService,
}

impl AppState {
    pub fn new(config: AppConfig, crm: Arc<dyn CrmApi>) -> Self {
        Self {
            config,
            lead_sync: LeadSyncService::new(crm),
        }
    }
}

/// Build state backed by the live LeadConnector API.
pub fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let client = GhlClient::new(
        &config.ghl.base_url,
        GhlCredentials::new(&config.ghl.client_id, &config.ghl.client_secret),
        config.ghl.location_id.clone(),
    )?;
    Ok(AppState::new(config, Arc::new(client)))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match &config.allowed_origins {
        Some(origins) if origins.iter().any(|origin| origin == "*") => AllowOrigin::any(),
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Wrap routes with tracing, CORS, and panic-to-500 conversion.
pub fn apply_layers(router: Router, config: &AppConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

pub fn build_router(state: AppState) -> Router {
    let cors_config = state.config.clone();
    let router = api::router().with_state(Arc::new(state));
    apply_layers(router, &cors_config)
}
