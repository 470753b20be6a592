//! Domain types shared by the upstream clients and the handlers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Longest travel time, in seconds, accepted as plausible.
pub const MAX_PLAUSIBLE_DURATION_SECS: u64 = 2 * 60 * 60;

/// Most predictions returned for one station.
pub const PREDICTION_LIMIT: usize = 6;

/// A routing endpoint: free-text address or coordinates.
///
/// Serializes to the routing provider's waypoint shape, which is also the
/// canonical form used in cache keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Address { address: String },
    Coordinates { location: Waypoint },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(rename = "latLng")]
    pub lat_lng: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn address(address: impl Into<String>) -> Self {
        Location::Address {
            address: address.into(),
        }
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Location::Coordinates {
            location: Waypoint {
                lat_lng: LatLng {
                    latitude,
                    longitude,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    Drive,
    Walk,
}

/// Result of one directed routing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    /// Provider duration string, `"<seconds>s"`
    pub duration: String,
    pub distance_meters: u64,
}

impl RouteResult {
    /// Duration in seconds, if the string is well formed.
    pub fn duration_secs(&self) -> Option<u64> {
        parse_duration_secs(&self.duration)
    }

    /// Duration in seconds, treated as absent when above the plausibility bound.
    pub fn plausible_duration_secs(&self) -> Option<u64> {
        self.duration_secs()
            .filter(|secs| *secs <= MAX_PLAUSIBLE_DURATION_SECS)
    }
}

/// Parses a provider duration such as `"754s"`.
///
/// Negative, fractional or suffix-less values are rejected.
pub fn parse_duration_secs(raw: &str) -> Option<u64> {
    let digits = raw.strip_suffix('s')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Southbound,
    Northbound,
}

impl Direction {
    /// Provider direction id: 0 runs south (Ashmont/Braintree), 1 north (Alewife).
    pub fn from_id(id: i64) -> Self {
        if id == 0 {
            Direction::Southbound
        } else {
            Direction::Northbound
        }
    }
}

/// One upcoming vehicle arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitPrediction {
    pub arrival_time: Option<DateTime<FixedOffset>>,
    pub departure_time: Option<DateTime<FixedOffset>>,
    pub direction: Direction,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_wire_shape() {
        let address = serde_json::to_value(Location::address("1 Main St, Boston")).unwrap();
        assert_eq!(address, json!({"address": "1 Main St, Boston"}));

        let coords = serde_json::to_value(Location::coordinates(42.3734, -71.119)).unwrap();
        assert_eq!(
            coords,
            json!({"location": {"latLng": {"latitude": 42.3734, "longitude": -71.119}}})
        );
    }

    #[test]
    fn test_travel_mode_wire_names() {
        assert_eq!(serde_json::to_value(TravelMode::Drive).unwrap(), "DRIVE");
        assert_eq!(serde_json::to_value(TravelMode::Walk).unwrap(), "WALK");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("0s"), Some(0));
        assert_eq!(parse_duration_secs("754s"), Some(754));
        assert_eq!(parse_duration_secs("754"), None);
        assert_eq!(parse_duration_secs("-5s"), None);
        assert_eq!(parse_duration_secs("1.5s"), None);
        assert_eq!(parse_duration_secs("s"), None);
    }

    #[test]
    fn test_plausibility_bound() {
        let route = |duration: &str| RouteResult {
            duration: duration.to_string(),
            distance_meters: 100,
        };
        assert_eq!(route("7200s").plausible_duration_secs(), Some(7200));
        assert_eq!(route("7201s").plausible_duration_secs(), None);
        assert_eq!(route("7201s").duration_secs(), Some(7201));
    }

    #[test]
    fn test_direction_from_id() {
        assert_eq!(Direction::from_id(0), Direction::Southbound);
        assert_eq!(Direction::from_id(1), Direction::Northbound);
    }
}
