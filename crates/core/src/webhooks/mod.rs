//! Inbound CRM webhook events.

mod webhook_dispatcher;
mod webhook_model;

pub use webhook_dispatcher::*;
pub use webhook_model::*;
