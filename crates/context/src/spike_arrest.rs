use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Requests-per-second ceiling, written in the gateway rate notation (`"1000ps"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpikeArrest(NonZeroU32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpikeArrestParseError {
    #[error("spike arrest rate must end with 'ps', got '{0}'")]
    MissingUnit(String),
    #[error("spike arrest rate '{0}' is not a positive integer")]
    InvalidRate(String),
}

impl SpikeArrest {
    pub fn per_second(rate: u32) -> Option<Self> {
        NonZeroU32::new(rate).map(Self)
    }

    pub fn requests_per_second(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for SpikeArrest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ps", self.0)
    }
}

impl FromStr for SpikeArrest {
    type Err = SpikeArrestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let Some(rate) = trimmed.strip_suffix("ps") else {
            return Err(SpikeArrestParseError::MissingUnit(s.to_owned()));
        };

        rate.parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| SpikeArrestParseError::InvalidRate(s.to_owned()))
    }
}

impl Serialize for SpikeArrest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpikeArrest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            PerSecond(u32),
            Notation(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::PerSecond(rate) => {
                Self::per_second(rate).ok_or_else(|| serde::de::Error::custom("spike arrest rate must be positive"))
            }
            Raw::Notation(notation) => notation.parse().map_err(serde::de::Error::custom),
        }
    }
}
