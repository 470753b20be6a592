//! API Routes
//!
//! Configures the Axum router and the request pipeline that wraps every
//! endpoint, including the not-found fallback.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{
        header::{self, HeaderValue},
        Method, StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::handlers::{
    all_handler, driving_handler, health_handler, mbta_handler, not_found_handler, AppState,
};
use crate::error::{ApiError, ErrorEnvelope};
use crate::models::MethodNotAllowedResponse;
use crate::rate_limit::client_identity;

/// Header carrying the request's processing time in milliseconds.
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time";

const CORS_HEADERS: [(header::HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, HEAD, POST, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /driving` - Drive time in both directions
/// - `GET /mbta` - Transit predictions, optional walking time
/// - `GET /all` - Both of the above, failing independently
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Request pipeline: CORS, method filter, rate limit, configuration check,
///   processing time
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/driving", get(driving_handler))
        .route("/mbta", get(mbta_handler))
        .route("/all", get(all_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), request_pipeline))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs before every handler, in order: CORS preflight, method filter,
/// rate limit, configuration check. Every response leaving it carries CORS
/// and processing-time headers.
pub async fn request_pipeline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else if request.method() != Method::GET {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(MethodNotAllowedResponse::default()),
        )
            .into_response()
    } else {
        let client_id = client_identity(request.headers());
        match admit(&state, &client_id).await {
            Ok(()) => {
                let path = request.uri().path().to_string();
                info!("Processing {} {} from {}", request.method(), path, client_id);
                let response = next.run(request).await;
                info!(
                    "Request completed in {}ms for {}",
                    started.elapsed().as_millis(),
                    path
                );
                response
            }
            Err(e) => e.into_response(),
        }
    };

    finalize(response, started)
}

/// Rate limit, then configuration.
async fn admit(state: &AppState, client_id: &str) -> Result<(), ApiError> {
    match state.rate_limiter() {
        Some(limiter) => {
            if !limiter.check_and_record(client_id).await {
                return Err(ApiError::RateLimitExceeded);
            }
        }
        None => warn!("No store bound, skipping rate limit for {}", client_id),
    }

    state.services().map(|_| ())
}

/// Stamps headers and re-renders error envelopes with the elapsed time.
fn finalize(response: Response, started: Instant) -> Response {
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut response = match response.extensions().get::<ErrorEnvelope>().cloned() {
        Some(envelope) => {
            let status = response.status();
            error!(
                "Request failed with {} after {}ms: {}",
                status, elapsed, envelope.message
            );
            (status, Json(envelope.with_processing_time(elapsed))).into_response()
        }
        None => response,
    };

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers
            .entry(name)
            .or_insert(HeaderValue::from_static(value));
    }
    headers.insert(PROCESSING_TIME_HEADER, HeaderValue::from(elapsed));

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::upstream::{TransitApi, TransitPrediction, UpstreamError};
    use async_trait::async_trait;
    use axum::body::Body;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct EmptyTransit;

    #[async_trait]
    impl TransitApi for EmptyTransit {
        async fn fetch_predictions(
            &self,
            _station_id: &str,
            _route_id: &str,
        ) -> Result<Vec<TransitPrediction>, UpstreamError> {
            Ok(Vec::new())
        }
    }

    fn create_test_app() -> Router {
        // no routing binding: only the pipeline itself is under test here
        let state = AppState::with_memory_store(Config::default(), None, Arc::new(EmptyTransit));
        create_router(state)
    }

    #[tokio::test]
    async fn test_options_short_circuits() {
        let app = create_test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("OPTIONS")
                    .uri("/driving")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().contains_key(PROCESSING_TIME_HEADER));
    }

    #[tokio::test]
    async fn test_post_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_missing_configuration_is_503() {
        let app = create_test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(PROCESSING_TIME_HEADER));
    }

    #[test]
    fn test_finalize_adds_processing_time_to_envelope() {
        let response = finalize(ApiError::RateLimitExceeded.into_response(), Instant::now());

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, HEAD, POST, OPTIONS"
        );
        assert!(response.extensions().get::<ErrorEnvelope>().is_none());
    }
}
