use config::{QuotaConfig, TierLimits};
use context::{ClientIdentity, QueryClass, QuotaDecision, RateKey};

use crate::{ClassificationRequest, OTHERS_TIER, UNIDENTIFIED_TIER, tier::Tier};

/// Maps requests to quota and spike arrest allowances.
///
/// The classifier is total: every request, including one without any client
/// headers, gets a decision. It holds no mutable state and can be shared freely
/// between request handlers.
#[derive(Debug, Clone)]
pub struct Classifier {
    tiers: Vec<Tier>,
    others: TierLimits,
    unidentified: TierLimits,
    unidentified_prefix: String,
}

impl Classifier {
    pub fn new(config: &QuotaConfig) -> Self {
        Self {
            tiers: config.tiers.iter().map(Tier::from).collect(),
            others: config.others,
            unidentified: config.unidentified,
            unidentified_prefix: config.unidentified_prefix.clone(),
        }
    }

    pub fn classify(&self, request: &ClassificationRequest<'_>) -> QuotaDecision {
        let query_class = QueryClass::from_client_type(request.client_type);

        let (tier, limits, identity) = match ClientIdentity::identified(request.client_name) {
            Some(identity) => {
                let (tier, limits) = self.select_tier(identity.as_str());
                (tier, limits, identity)
            }
            None => {
                let identity = ClientIdentity::synthesized(&self.unidentified_prefix, request.client_ip);
                (UNIDENTIFIED_TIER, self.unidentified, identity)
            }
        };

        let limits = limits.for_class(query_class);
        let rate_key = RateKey::new(&identity, query_class);

        log::debug!(
            "Client '{identity}' classified as tier '{tier}' for {query_class} queries: quota {}, spike arrest {}",
            limits.quota,
            limits.spike_arrest
        );

        QuotaDecision {
            tier: tier.to_owned(),
            query_class,
            identity,
            quota_allowed: limits.quota.get(),
            spike_arrest_allowed: limits.spike_arrest,
            rate_key,
        }
    }

    /// First tier with a pattern contained in the name wins, in configuration order.
    fn select_tier(&self, client_name: &str) -> (&str, TierLimits) {
        self.tiers
            .iter()
            .find(|tier| tier.matches(client_name))
            .map(|tier| (tier.name.as_str(), tier.limits))
            .unwrap_or((OTHERS_TIER, self.others))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&QuotaConfig::default())
    }
}
