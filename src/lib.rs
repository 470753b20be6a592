//! Travel Time - driving and transit travel-time service
//!
//! Aggregates a routing API and a transit-predictions API behind a small
//! HTTP surface with input validation, response caching and per-client
//! rate limiting.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod stations;
pub mod store;
pub mod tasks;
pub mod upstream;
pub mod validation;


pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
