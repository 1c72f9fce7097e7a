//! Quota tier table and the headers the classifier reads.

use std::num::NonZeroU64;

use context::{QueryClass, SpikeArrest};
use serde::Deserialize;

/// Settings for the quota classifier and its decision endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuotaConfig {
    /// Whether requests are classified at all.
    pub enabled: bool,
    /// Path of the decision endpoint.
    pub path: String,
    /// Header carrying the calling application's name.
    pub client_name_header: String,
    /// Header carrying the query type. Only the value `trip` selects trip limits.
    pub client_type_header: String,
    /// Prepended to the caller address when a client does not send its name.
    pub unidentified_prefix: String,
    /// Known clients, tested in order. The first tier with a pattern contained in
    /// the client name wins.
    pub tiers: Vec<TierConfig>,
    /// Limits for named clients that match no tier.
    pub others: TierLimits,
    /// Limits for clients that send no name at all.
    pub unidentified: TierLimits,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/quota".to_string(),
            client_name_header: "et-client-name".to_string(),
            client_type_header: "et-client-type".to_string(),
            unidentified_prefix: "unkown-".to_string(),
            tiers: default_tiers(),
            others: TierLimits::new(limits(500, 150), limits(1000, 200)),
            unidentified: TierLimits::new(limits(30, 2), limits(60, 20)),
        }
    }
}

/// A named group of clients sharing the same allowances.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub name: String,
    /// Substrings of the client name that select this tier.
    pub patterns: Vec<String>,
    pub trip: Limits,
    pub not_trip: Limits,
}

impl TierConfig {
    pub fn limits(&self) -> TierLimits {
        TierLimits::new(self.trip, self.not_trip)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierLimits {
    pub trip: Limits,
    pub not_trip: Limits,
}

impl TierLimits {
    pub fn new(trip: Limits, not_trip: Limits) -> Self {
        Self { trip, not_trip }
    }

    pub fn for_class(&self, query_class: QueryClass) -> Limits {
        match query_class {
            QueryClass::Trip => self.trip,
            QueryClass::NotTrip => self.not_trip,
        }
    }
}

/// Quota and spike arrest allowances for one query class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    /// Requests per quota window.
    pub quota: NonZeroU64,
    /// Requests per second. Accepts `800` or `"800ps"`.
    pub spike_arrest: SpikeArrest,
}

impl Limits {
    pub fn new(quota: u64, spike_arrest: u32) -> Option<Self> {
        Some(Self {
            quota: NonZeroU64::new(quota)?,
            spike_arrest: SpikeArrest::per_second(spike_arrest)?,
        })
    }
}

fn limits(quota: u64, spike_arrest: u32) -> Limits {
    Limits::new(quota, spike_arrest).expect("built-in limits should be positive")
}

fn tier(name: &str, pattern: &str, trip: Limits, not_trip: Limits) -> TierConfig {
    TierConfig {
        name: name.to_string(),
        patterns: vec![pattern.to_string()],
        trip,
        not_trip,
    }
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        tier("nsb", "nsb", limits(10000, 1000), limits(15000, 800)),
        tier(
            "vy-high",
            "vy-itinerary-high-priority",
            limits(14000, 800),
            limits(8000, 600),
        ),
        tier(
            "vy-medium",
            "vy-itinerary-medium-priority",
            limits(5000, 600),
            limits(8000, 600),
        ),
        tier("ruter", "ruter", limits(15000, 1000), limits(15000, 1500)),
        tier("skyss", "skyss", limits(3000, 150), limits(3000, 200)),
        tier("entur", "entur", limits(4000, 400), limits(5000, 500)),
        tier("kolumbus", "kolumbus-reisevenn", limits(1500, 150), limits(3000, 300)),
        tier("atb-bff", "atb-bff", limits(2000, 200), limits(8000, 500)),
        tier("sj-nord", "sj-nord", limits(4000, 200), limits(2000, 200)),
        tier("nfk-bff", "nfk-bff", limits(1000, 300), limits(2000, 400)),
        tier("fram-bff", "fram-nord", limits(1000, 300), limits(2000, 400)),
    ]
}
