use std::fmt;

use serde::Serialize;

/// The kind of query a client sends. Itinerary searches are more expensive to
/// compute than anything else, so they get their own allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryClass {
    #[serde(rename = "trip")]
    Trip,
    #[serde(rename = "notTrip")]
    NotTrip,
}

impl QueryClass {
    /// The client type value that marks a trip query. Compared case-sensitively.
    pub const TRIP_CLIENT_TYPE: &'static str = "trip";

    /// Classifies a request from its client type header. Anything other than the
    /// exact value `trip`, including a missing header, is `NotTrip`.
    pub fn from_client_type(client_type: Option<&str>) -> Self {
        match client_type {
            Some(Self::TRIP_CLIENT_TYPE) => Self::Trip,
            _ => Self::NotTrip,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryClass::Trip => "trip",
            QueryClass::NotTrip => "notTrip",
        }
    }
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::QueryClass;

    #[test]
    fn only_exact_trip_is_trip() {
        assert_eq!(QueryClass::from_client_type(Some("trip")), QueryClass::Trip);

        for other in ["Trip", "TRIP", " trip", "trip ", "", "notTrip", "trips"] {
            assert_eq!(QueryClass::from_client_type(Some(other)), QueryClass::NotTrip, "{other:?}");
        }
    }

    #[test]
    fn missing_client_type_is_not_trip() {
        assert_eq!(QueryClass::from_client_type(None), QueryClass::NotTrip);
    }

    #[test]
    fn labels() {
        assert_eq!(QueryClass::Trip.to_string(), "trip");
        assert_eq!(QueryClass::NotTrip.to_string(), "notTrip");
    }
}
