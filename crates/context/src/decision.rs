use serde::Serialize;

use crate::{ClientIdentity, QueryClass, RateKey, SpikeArrest};

/// The outcome of classifying one request, attached to the request for the
/// enforcement layer downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaDecision {
    /// Name of the tier the client was assigned to.
    pub tier: String,
    pub query_class: QueryClass,
    pub identity: ClientIdentity,
    /// Requests allowed per quota window.
    pub quota_allowed: u64,
    pub spike_arrest_allowed: SpikeArrest,
    pub rate_key: RateKey,
}

/// The decision flattened into the variable names the enforcement gateway reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaVariables<'a> {
    #[serde(rename = "quota.client.identifier")]
    pub quota_identifier: &'a RateKey,
    #[serde(rename = "quota.client.allowed")]
    pub quota_allowed: u64,
    #[serde(rename = "spikeArrest.client.identifier")]
    pub spike_arrest_identifier: &'a RateKey,
    #[serde(rename = "spikeArrest.client.allowed")]
    pub spike_arrest_allowed: SpikeArrest,
    #[serde(rename = "client.name")]
    pub client_name: &'a str,
    #[serde(rename = "client.name.synthesized")]
    pub client_name_synthesized: bool,
    #[serde(rename = "client.tier")]
    pub tier: &'a str,
    #[serde(rename = "client.queryClass")]
    pub query_class: QueryClass,
}

impl QuotaDecision {
    pub fn variables(&self) -> QuotaVariables<'_> {
        QuotaVariables {
            quota_identifier: &self.rate_key,
            quota_allowed: self.quota_allowed,
            spike_arrest_identifier: &self.rate_key,
            spike_arrest_allowed: self.spike_arrest_allowed,
            client_name: self.identity.as_str(),
            client_name_synthesized: self.identity.synthesized,
            tier: &self.tier,
            query_class: self.query_class,
        }
    }

    /// The identity the client name header must be rewritten to, if the client
    /// did not identify itself.
    pub fn rewritten_client_name(&self) -> Option<&str> {
        self.identity.synthesized.then(|| self.identity.as_str())
    }
}
