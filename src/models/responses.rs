//! Response DTOs for the travel-time API
//!
//! Field names follow the public JSON contract (camelCase).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::upstream::{Direction, RouteResult, TransitPrediction};

/// Endpoints listed in 404 responses.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["/driving", "/mbta", "/all", "/health"];

// == Driving ==

/// One directed leg as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// Provider duration string, `"<seconds>s"`
    pub duration: String,
    pub distance_meters: u64,
}

impl From<RouteResult> for Leg {
    fn from(route: RouteResult) -> Self {
        Self {
            duration: route.duration,
            distance_meters: route.distance_meters,
        }
    }
}

/// Both directions of a drive-time query; this is what gets cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveTimes {
    pub to: Leg,
    pub from: Leg,
}

/// Body of `GET /driving`
#[derive(Debug, Clone, Serialize)]
pub struct DriveTimesResponse {
    pub to: Leg,
    pub from: Leg,
    /// When the legs were fetched, Unix milliseconds
    pub timestamp: i64,
    pub cached: bool,
    /// Seconds until a cached result stops being fresh
    #[serde(rename = "cacheTTL", skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<u64>,
}

impl DriveTimesResponse {
    pub fn fetched(times: DriveTimes, timestamp: i64) -> Self {
        Self {
            to: times.to,
            from: times.from,
            timestamp,
            cached: false,
            cache_ttl: None,
        }
    }

    pub fn from_cache(entry: CacheEntry<DriveTimes>, fresh_secs_remaining: u64) -> Self {
        Self {
            to: entry.payload.to,
            from: entry.payload.from,
            timestamp: entry.timestamp,
            cached: true,
            cache_ttl: Some(fresh_secs_remaining),
        }
    }
}

// == Transit ==

/// One prediction as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub arrival: Option<DateTime<FixedOffset>>,
    pub departure: Option<DateTime<FixedOffset>>,
    pub direction: Direction,
    pub status: Option<String>,
}

impl From<TransitPrediction> for PredictionView {
    fn from(prediction: TransitPrediction) -> Self {
        Self {
            arrival: prediction.arrival_time,
            departure: prediction.departure_time,
            direction: prediction.direction,
            status: prediction.status,
        }
    }
}

/// Walk from the station to the requested destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkingTime {
    pub seconds: u64,
    /// `seconds` rounded up to whole minutes
    pub minutes: u64,
    /// Meters
    pub distance: u64,
}

impl WalkingTime {
    pub fn new(seconds: u64, distance: u64) -> Self {
        Self {
            seconds,
            minutes: seconds.div_ceil(60),
            distance,
        }
    }
}

/// Body of `GET /mbta`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MbtaResponse {
    pub predictions: Vec<PredictionView>,
    pub walking_time: Option<WalkingTime>,
    pub station_name: String,
    pub timestamp: i64,
    pub cached: bool,
}

// == Combined ==

/// Outcome of one `/all` branch: the branch's payload or its error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Branch<T> {
    Ok(T),
    Failed { error: String, timestamp: i64 },
}

/// Body of `GET /all`
#[derive(Debug, Clone, Serialize)]
pub struct AllResponse {
    pub driving: Branch<DriveTimesResponse>,
    pub mbta: Branch<MbtaResponse>,
    pub timestamp: i64,
}

// == Misc ==

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(timestamp: i64) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body returned for unknown paths.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: String,
    pub message: String,
    pub available_endpoints: Vec<String>,
}

impl NotFoundResponse {
    pub fn for_path(path: &str) -> Self {
        Self {
            error: "Endpoint Not Found".to_string(),
            message: format!("The endpoint {path} does not exist"),
            available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Body returned for any method other than GET or OPTIONS.
#[derive(Debug, Clone, Serialize)]
pub struct MethodNotAllowedResponse {
    pub error: String,
    pub message: String,
}

impl Default for MethodNotAllowedResponse {
    fn default() -> Self {
        Self {
            error: "Method Not Allowed".to_string(),
            message: "Only GET requests are supported".to_string(),
        }
    }
}
