use std::{fmt, net::IpAddr};

use serde::Serialize;

/// Represents the calling application as seen by the quota policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClientIdentity {
    /// The client name (e.g., "ruter-reiseplanlegger" or "unkown-10.0.0.1")
    pub name: String,
    /// Whether the name was derived from the caller address because the client
    /// did not identify itself.
    pub synthesized: bool,
}

impl ClientIdentity {
    /// Returns `None` for missing or empty names, so callers fall back to
    /// [`ClientIdentity::synthesized`].
    pub fn identified(name: Option<&str>) -> Option<Self> {
        name.filter(|name| !name.is_empty()).map(|name| Self {
            name: name.to_owned(),
            synthesized: false,
        })
    }

    pub fn synthesized(prefix: &str, ip: IpAddr) -> Self {
        Self {
            name: format!("{prefix}{ip}"),
            synthesized: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
