//! Models Module
//!
//! Query parameters and response bodies for the HTTP API.

pub mod requests;
pub mod responses;

pub use requests::{AllQuery, DrivingQuery, MbtaQuery};
pub use responses::{
    AllResponse, Branch, DriveTimes, DriveTimesResponse, HealthResponse, Leg, MbtaResponse,
    MethodNotAllowedResponse, NotFoundResponse, PredictionView, WalkingTime,
};
