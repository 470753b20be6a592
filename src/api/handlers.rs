//! API Handlers
//!
//! HTTP request handlers for each endpoint, plus the drive-time and transit
//! lookups they share with `/all`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    Json,
};
use tracing::{info, warn};

use super::extract::Params;
use crate::cache::{drive_time_cache_key, CacheEntry, ResponseCache};
use crate::clock::now_ms;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::requests::provided;
use crate::models::{
    AllQuery, AllResponse, Branch, DriveTimes, DriveTimesResponse, DrivingQuery, HealthResponse,
    MbtaQuery, MbtaResponse, NotFoundResponse, PredictionView, WalkingTime,
};
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::stations::{self, Station};
use crate::store::{KvStore, MemoryStore, SharedStore};
use crate::upstream::{
    Location, PredictionsClient, PredictionsConfig, RoutesClient, RoutesConfig, RoutingApi,
    TransitApi, TravelMode,
};
use crate::validation::{validate_address, validate_station_id, SanitizedAddress};

/// Application state shared across all handlers.
///
/// Bindings are optional: a missing API key or store is reported per request
/// as a configuration error rather than preventing startup.
#[derive(Clone)]
pub struct AppState {
    /// Storage capability for the cache and the rate limiter
    pub store: Option<Arc<dyn KvStore>>,
    /// Routing client; absent when no API key is configured
    pub routing: Option<Arc<dyn RoutingApi>>,
    pub transit: Arc<dyn TransitApi>,
    pub config: Arc<Config>,
}

/// Bindings resolved for one request.
#[derive(Clone)]
pub struct Services {
    pub cache: ResponseCache,
    pub routing: Arc<dyn RoutingApi>,
    pub transit: Arc<dyn TransitApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Option<Arc<dyn KvStore>>,
        routing: Option<Arc<dyn RoutingApi>>,
        transit: Arc<dyn TransitApi>,
    ) -> Self {
        Self {
            store,
            routing,
            transit,
            config: Arc::new(config),
        }
    }

    /// Builds the production state: HTTP clients plus the given store.
    pub fn from_config(
        config: &Config,
        store: SharedStore,
    ) -> std::result::Result<Self, reqwest::Error> {
        let routing = match &config.google_api_key {
            Some(key) => {
                let routes = RoutesConfig::new(key.clone())
                    .with_url(config.routes_api_url.clone())
                    .with_timeout(config.routing_timeout);
                Some(Arc::new(RoutesClient::new(routes)?) as Arc<dyn RoutingApi>)
            }
            None => None,
        };

        let predictions = PredictionsConfig::default()
            .with_api_key(config.mbta_api_key.clone())
            .with_base_url(config.predictions_api_url.clone())
            .with_timeout(config.predictions_timeout);
        let transit = Arc::new(PredictionsClient::new(predictions)?);

        Ok(Self::new(
            config.clone(),
            Some(Arc::new(store)),
            routing,
            transit,
        ))
    }

    /// Convenience constructor backed by a fresh in-process store.
    pub fn with_memory_store(
        config: Config,
        routing: Option<Arc<dyn RoutingApi>>,
        transit: Arc<dyn TransitApi>,
    ) -> Self {
        let store = SharedStore::new(MemoryStore::new(config.max_entries));
        Self::new(config, Some(Arc::new(store)), routing, transit)
    }

    /// Rate limiter over the store, if one is bound.
    pub fn rate_limiter(&self) -> Option<RateLimiter> {
        let policy = RateLimitPolicy {
            max_requests: self.config.rate_limit_max_requests,
            window: self.config.rate_limit_window,
        };
        self.store
            .as_ref()
            .map(|store| RateLimiter::new(store.clone(), policy))
    }

    /// Resolves the bindings every endpoint depends on.
    pub fn services(&self) -> Result<Services> {
        let routing = self
            .routing
            .clone()
            .ok_or_else(|| ApiError::Configuration("Google API key missing".to_string()))?;
        let store = self
            .store
            .clone()
            .ok_or_else(|| ApiError::Configuration("cache unavailable".to_string()))?;

        Ok(Services {
            cache: ResponseCache::new(store, self.config.cache_freshness, self.config.cache_ttl),
            routing,
            transit: self.transit.clone(),
            config: self.config.clone(),
        })
    }
}

// == Lookups ==

fn resolve_address(param: Option<&str>, default: &str) -> Result<Location> {
    match param {
        Some(raw) => Ok(Location::address(validate_address(raw)?.into_inner())),
        None => Ok(Location::address(default)),
    }
}

/// Drive time in both directions, served from cache while fresh.
pub async fn drive_times(services: &Services, query: &DrivingQuery) -> Result<DriveTimesResponse> {
    let config = &services.config;
    let origin = resolve_address(provided(&query.origin), &config.default_origin)?;
    let destination = resolve_address(provided(&query.destination), &config.default_destination)?;

    let key = drive_time_cache_key(&origin, &destination);
    let freshness = services.cache.freshness();

    if let Some(entry) = services.cache.get::<DriveTimes>(&key).await {
        let now = now_ms();
        if entry.is_fresh(now, freshness) {
            info!("Returning cached drive times");
            let remaining = entry.fresh_secs_remaining(now, freshness);
            return Ok(DriveTimesResponse::from_cache(entry, remaining));
        }
    }

    let (to, from) = tokio::try_join!(
        services.routing.fetch_route(&origin, &destination, TravelMode::Drive),
        services.routing.fetch_route(&destination, &origin, TravelMode::Drive),
    )?;

    let times = DriveTimes {
        to: to.into(),
        from: from.into(),
    };
    let entry = CacheEntry::new(times, now_ms());
    services.cache.put(&key, &entry).await;

    Ok(DriveTimesResponse::fetched(entry.payload, entry.timestamp))
}

/// Upcoming arrivals, with an optional walk from the station to a destination.
pub async fn transit_arrivals(services: &Services, query: &MbtaQuery) -> Result<MbtaResponse> {
    let config = &services.config;

    let station_id = match provided(&query.station) {
        Some(raw) => validate_station_id(raw)?.id.to_string(),
        None => config.default_station.clone(),
    };
    let destination = provided(&query.destination)
        .map(validate_address)
        .transpose()?;

    let predictions = services
        .transit
        .fetch_predictions(&station_id, &config.transit_route)
        .await?;

    let station = stations::find(&station_id);
    let walking_time = match (station, destination) {
        (Some(station), Some(destination)) => walking_time(services, station, destination).await,
        _ => None,
    };

    Ok(MbtaResponse {
        predictions: predictions.into_iter().map(PredictionView::from).collect(),
        walking_time,
        station_name: station.map_or("Unknown", |s| s.name).to_string(),
        timestamp: now_ms(),
        cached: false,
    })
}

/// Best-effort walking estimate; any failure just omits it.
async fn walking_time(
    services: &Services,
    station: &Station,
    destination: SanitizedAddress,
) -> Option<WalkingTime> {
    let target = Location::address(destination.into_inner());

    match services
        .routing
        .fetch_route(&station.location(), &target, TravelMode::Walk)
        .await
    {
        Ok(route) => match route.plausible_duration_secs() {
            Some(seconds) => Some(WalkingTime::new(seconds, route.distance_meters)),
            None => {
                warn!("Invalid walking time received: {}", route.duration);
                None
            }
        },
        Err(e) => {
            warn!("Failed to calculate walking time: {}", e);
            None
        }
    }
}

fn branch<T>(name: &str, outcome: Result<T>) -> Branch<T> {
    match outcome {
        Ok(value) => Branch::Ok(value),
        Err(e) => {
            warn!("{} branch failed: {}", name, e);
            Branch::Failed {
                error: e.to_string(),
                timestamp: now_ms(),
            }
        }
    }
}

// == Handlers ==

/// Handler for GET /driving
pub async fn driving_handler(
    State(state): State<AppState>,
    Params(query): Params<DrivingQuery>,
) -> Result<Json<DriveTimesResponse>> {
    let services = state.services()?;
    Ok(Json(drive_times(&services, &query).await?))
}

/// Handler for GET /mbta
pub async fn mbta_handler(
    State(state): State<AppState>,
    Params(query): Params<MbtaQuery>,
) -> Result<Json<MbtaResponse>> {
    let services = state.services()?;
    Ok(Json(transit_arrivals(&services, &query).await?))
}

/// Handler for GET /all
///
/// Both lookups run concurrently; each one's failure is reported in its own
/// field and never fails the other or the request.
pub async fn all_handler(
    State(state): State<AppState>,
    Params(query): Params<AllQuery>,
) -> Result<Json<AllResponse>> {
    let services = state.services()?;
    let driving_query = query.driving();
    let mbta_query = query.mbta();

    let (driving, mbta) = tokio::join!(
        drive_times(&services, &driving_query),
        transit_arrivals(&services, &mbta_query),
    );

    Ok(Json(AllResponse {
        driving: branch("driving", driving),
        mbta: branch("mbta", mbta),
        timestamp: now_ms(),
    }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(now_ms()))
}

/// Fallback for unknown paths
pub async fn not_found_handler(uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse::for_path(uri.path())),
    )
}
