use std::fmt;

use serde::Serialize;

use crate::{ClientIdentity, QueryClass};

/// Partition key for quota and spike arrest counters.
///
/// Always `<identity>-<query class>`, so two different identities never share
/// a counter and the same client gets separate counters per query class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RateKey(String);

impl RateKey {
    pub fn new(identity: &ClientIdentity, query_class: QueryClass) -> Self {
        Self(format!("{identity}-{query_class}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
