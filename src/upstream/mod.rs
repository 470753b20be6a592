//! Upstream API clients.
//!
//! Two providers are wrapped here:
//! - the routing API (directed travel time and distance between two locations)
//! - the transit predictions API (upcoming arrivals at a station)
//!
//! Each call is bounded by its own timeout and every failure is mapped to an
//! [`UpstreamError`]. No retries are attempted.

mod error;
mod predictions;
mod routes;
mod types;

use async_trait::async_trait;

pub use error::{classify_status, Service, UpstreamError};
pub use predictions::{PredictionsClient, PredictionsConfig};
pub use routes::{RoutesClient, RoutesConfig};
pub use types::{
    parse_duration_secs, Direction, LatLng, Location, RouteResult, TransitPrediction, TravelMode,
    Waypoint, MAX_PLAUSIBLE_DURATION_SECS, PREDICTION_LIMIT,
};

/// Directed routing between two locations.
#[async_trait]
pub trait RoutingApi: Send + Sync {
    async fn fetch_route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> Result<RouteResult, UpstreamError>;
}

/// Upcoming arrivals for one station on one route.
#[async_trait]
pub trait TransitApi: Send + Sync {
    async fn fetch_predictions(
        &self,
        station_id: &str,
        route_id: &str,
    ) -> Result<Vec<TransitPrediction>, UpstreamError>;
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;

    /// Serves `app` on an ephemeral local port and returns its base URL.
    pub async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
