//! GoHighLevel (LeadConnector) API client.
//!
//! Implements [`leadsync_core::CrmApi`] over the LeadConnector REST API using a
//! client-credentials token exchange.

mod client;
mod error;
mod types;

pub use client::{GhlClient, GhlCredentials, API_VERSION, DEFAULT_BASE_URL};
pub use error::{GhlError, Result};
pub use types::*;
