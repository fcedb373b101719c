use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::TransportMode;
use crate::services::directions::{DirectionsClient, TravelEstimator};

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub origin: String,
    pub destination: String,
    pub mode: Option<TransportMode>,
}

/// UI-facing travel line: "about N minutes from X". Lookup failures are
/// surfaced as errors here - the scheduling validator has its own
/// fail-open policy and does not go through this handler.
#[axum::debug_handler]
pub async fn get_estimate(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<EstimateQuery>,
) -> Result<Json<Value>, AppError> {
    if query.origin.trim().is_empty() || query.destination.trim().is_empty() {
        return Err(AppError::BadRequest(
            "origin and destination are required".to_string(),
        ));
    }

    let client = DirectionsClient::new(&state)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let estimate = client
        .estimate(
            &query.origin,
            &query.destination,
            query.mode.unwrap_or_default(),
        )
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({
        "duration_minutes": estimate.duration_minutes,
        "distance_meters": estimate.distance_meters,
    })))
}
