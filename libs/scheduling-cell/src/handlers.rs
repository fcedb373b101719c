use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    CreateBookingRequest, SchedulingError, UpdateStatusRequest, ValidateBookingRequest,
};
use crate::services::booking::BookingService;

fn map_scheduling_error(err: SchedulingError) -> AppError {
    match err {
        SchedulingError::Rejected(msg) => AppError::Conflict(msg),
        SchedulingError::RaceConflict(msg) => AppError::Conflict(msg),
        SchedulingError::Configuration(msg) => AppError::Configuration(msg),
        SchedulingError::InvalidRequest(msg) => AppError::BadRequest(msg),
        SchedulingError::InvalidTransition { .. } => AppError::BadRequest(err.to_string()),
        SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        SchedulingError::Database(msg) => AppError::Database(msg),
    }
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub date: NaiveDate,
}

/// The validateScheduling RPC, consumed by the new-appointment form.
#[axum::debug_handler]
pub async fn validate_booking(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<ValidateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let response = service
        .validate_booking(&provider_id, &request, Some(auth.token()))
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(response)))
}

/// Public booking-request intake: clients submit a would-be booking,
/// which is validated and stored as a pending appointment.
#[axum::debug_handler]
pub async fn create_booking_request(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(&state);

    let (appointment, validation) = service
        .create_booking(&provider_id, &request, None)
        .await
        .map_err(map_scheduling_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "appointment": appointment,
            "travel_buffers": validation.travel_buffers,
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    Query(query): Query<AppointmentsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let appointments = service
        .appointments_for_day(&provider_id, query.date, Some(auth.token()))
        .await
        .map_err(map_scheduling_error)?;

    let total = appointments.len();
    Ok(Json(json!({
        "appointments": appointments,
        "total": total,
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path((provider_id, appointment_id)): Path<(String, Uuid)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);

    let appointment = service
        .update_status(&provider_id, appointment_id, &request, Some(auth.token()))
        .await
        .map_err(map_scheduling_error)?;

    Ok(Json(json!(appointment)))
}
