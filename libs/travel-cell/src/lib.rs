pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{TransportMode, TravelError, TravelEstimate};
pub use services::directions::{DirectionsClient, TravelEstimator};
