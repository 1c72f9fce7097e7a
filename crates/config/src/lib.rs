mod client_ip;
mod error;
mod loader;
mod quota;
mod server;

use std::path::Path;

use serde::Deserialize;

pub use client_ip::ClientIpConfig;
pub use error::Error;
pub use quota::{Limits, QuotaConfig, TierConfig, TierLimits};
pub use server::{HealthConfig, ServerConfig, TlsServerConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub quota: QuotaConfig,
}

impl Config {
    /// Reads, expands and validates a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}
