//! Error types for the travel-time server
//!
//! Every failure that can reach the HTTP layer is an [`ApiError`]. Each variant
//! carries its own status code, so classification never depends on message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::clock;
use crate::upstream::UpstreamError;
use crate::validation::ValidationError;

// == Api Error Enum ==
/// Unified request-level error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad or unsafe user input
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Client exceeded its request budget
    #[error("Rate limit exceeded. Please wait before making more requests.")]
    RateLimitExceeded,

    /// A required binding (API key, storage) is missing
    #[error("Service configuration error - {0}")]
    Configuration(String),

    /// A primary upstream call failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error category.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category label used as the envelope's `error` field.
    pub fn label(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation Error",
            ApiError::RateLimitExceeded => "Rate Limit Exceeded",
            ApiError::Configuration(_) => "Service Unavailable",
            ApiError::Upstream(_) => "Upstream Error",
            ApiError::Internal(_) => "Internal Error",
        }
    }
}

// == Error Envelope ==
/// JSON body returned for every failed request.
///
/// Also stored in the response extensions so the request pipeline can
/// re-render it with the measured processing time.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    /// RFC 3339 time the error was produced
    pub timestamp: String,
    /// Milliseconds spent on the request
    #[serde(rename = "processingTime")]
    pub processing_time: u64,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: clock::now_rfc3339(),
            processing_time: 0,
        }
    }

    pub fn with_processing_time(mut self, millis: u64) -> Self {
        self.processing_time = millis;
        self
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = ErrorEnvelope::new(self.label(), self.to_string());

        let mut response = (status, Json(envelope.clone())).into_response();
        response.extensions_mut().insert(envelope);
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::Service;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ApiError::Validation(ValidationError::Empty).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimitExceeded.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Configuration("Google API key missing".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Upstream(UpstreamError::RateLimited(Service::Routing)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_is_passed_through() {
        let err = ApiError::from(UpstreamError::Timeout {
            service: Service::Transit,
            secs: 10,
        });
        assert_eq!(err.to_string(), "transit predictions API timed out after 10s");
    }

    #[test]
    fn test_response_carries_envelope_extension() {
        let response = ApiError::RateLimitExceeded.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let envelope = response.extensions().get::<ErrorEnvelope>().unwrap();
        assert_eq!(envelope.error, "Rate Limit Exceeded");
        assert!(envelope.message.contains("Rate limit exceeded"));
    }
}
