//! API Module
//!
//! HTTP handlers and routing for the travel-time REST API.
//!
//! # Endpoints
//! - `GET /driving` - Drive time to and from a destination
//! - `GET /mbta` - Upcoming train arrivals at a station
//! - `GET /all` - Driving and transit together
//! - `GET /health` - Health check endpoint

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::Params;
pub use handlers::*;
pub use routes::{create_router, request_pipeline, PROCESSING_TIME_HEADER};
