//! Lead domain models, classification, and the sync engine.

mod lead_classifier;
mod lead_sync_service;
mod leads_model;

pub use lead_classifier::*;
pub use lead_sync_service::*;
pub use leads_model::*;
