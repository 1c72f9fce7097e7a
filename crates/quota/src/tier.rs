use config::{TierConfig, TierLimits};

/// A configured tier with the client name substrings that select it.
#[derive(Debug, Clone)]
pub(crate) struct Tier {
    pub name: String,
    patterns: Vec<String>,
    pub limits: TierLimits,
}

impl Tier {
    pub fn matches(&self, client_name: &str) -> bool {
        self.patterns.iter().any(|pattern| client_name.contains(pattern.as_str()))
    }
}

impl From<&TierConfig> for Tier {
    fn from(config: &TierConfig) -> Self {
        Self {
            name: config.name.clone(),
            patterns: config.patterns.clone(),
            limits: config.limits(),
        }
    }
}
