use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{Datelike, NaiveDate};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ProviderError, UpdateTravelProfileRequest, UpdateWorkingHoursRequest};
use crate::services::schedule::ScheduleService;

fn map_provider_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::InvalidSchedule(msg) => {
            AppError::Configuration(format!("Please fix your working hours: {}", msg))
        }
        ProviderError::InvalidProfile(msg) => AppError::ValidationError(msg),
        ProviderError::NotFound => AppError::NotFound("Provider not found".to_string()),
        ProviderError::Database(msg) => AppError::Database(msg),
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenIntervalsQuery {
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn get_working_hours(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let records = service
        .get_working_hours(&provider_id, Some(auth.token()))
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!({ "days": records })))
}

#[axum::debug_handler]
pub async fn update_working_hours(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateWorkingHoursRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let records = service
        .update_working_hours(&provider_id, request, Some(auth.token()))
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!({ "days": records })))
}

/// Day view for the booking UI: working hours minus breaks for one date.
#[axum::debug_handler]
pub async fn get_open_intervals(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    Query(query): Query<OpenIntervalsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let schedule = service
        .get_week_schedule(&provider_id, Some(auth.token()))
        .await
        .map_err(map_provider_error)?;

    let intervals: Vec<Value> = schedule
        .open_intervals(query.date.weekday())
        .into_iter()
        .map(|(start, end)| {
            json!({
                "start": start.format("%H:%M").to_string(),
                "end": end.format("%H:%M").to_string(),
            })
        })
        .collect();

    Ok(Json(json!({
        "date": query.date,
        "open_intervals": intervals,
    })))
}

#[axum::debug_handler]
pub async fn get_travel_profile(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let profile = service
        .get_travel_profile(&provider_id, Some(auth.token()))
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn update_travel_profile(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateTravelProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(&state);

    let profile = service
        .update_travel_profile(&provider_id, request, Some(auth.token()))
        .await
        .map_err(map_provider_error)?;

    Ok(Json(json!(profile)))
}
