//! Request-scoped types shared between the classifier and the HTTP layer.

mod client_identity;
mod decision;
mod query_class;
mod rate_key;
mod spike_arrest;

pub use client_identity::ClientIdentity;
pub use decision::{QuotaDecision, QuotaVariables};
pub use query_class::QueryClass;
pub use rate_key::RateKey;
pub use spike_arrest::{SpikeArrest, SpikeArrestParseError};
