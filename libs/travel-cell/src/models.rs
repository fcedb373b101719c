// libs/travel-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the provider gets between jobs. Stored on the provider's travel
/// profile, passed through to the directions API as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Cycling,
    Transit,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Driving => write!(f, "driving"),
            TransportMode::Walking => write!(f, "walking"),
            TransportMode::Cycling => write!(f, "cycling"),
            TransportMode::Transit => write!(f, "transit"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelEstimate {
    pub duration_minutes: i64,
    pub distance_meters: i64,
}

/// An `Err` from the estimator means "travel time unknown" - callers must
/// never treat it as zero, and must not render a travel line from it.
#[derive(Debug, thiserror::Error)]
pub enum TravelError {
    #[error("Travel estimation is not configured")]
    NotConfigured,

    #[error("Directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directions API error: {message}")]
    Api { message: String },

    #[error("No route found between {origin} and {destination}")]
    NoRoute { origin: String, destination: String },
}

// ==============================================================================
// DIRECTIONS API WIRE MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct DirectionsPayload {
    pub status: String,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub distance_meters: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}
