//! Client identification and quota allocation.
//!
//! Every request is mapped to a tier of allowances from the client name and the
//! query type it declares. Enforcement of the resulting limits happens elsewhere;
//! this crate only decides what they are.

mod classifier;
mod request;
mod tier;

pub use classifier::Classifier;
pub use request::ClassificationRequest;

/// Tier assigned to named clients that match no configured pattern.
pub const OTHERS_TIER: &str = "others";

/// Tier assigned to clients that do not send a name.
pub const UNIDENTIFIED_TIER: &str = "unidentified";
