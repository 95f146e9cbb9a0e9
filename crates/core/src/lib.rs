//! Lead sync domain: CRM resource models, lead classification, and the
//! aggregation engine that joins upstream collections into leads.

pub mod crm;
pub mod error;
pub mod leads;
pub mod utils;
pub mod webhooks;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crm::{AccessToken, CrmApi, CrmResource};
pub use error::{Error, Result};
