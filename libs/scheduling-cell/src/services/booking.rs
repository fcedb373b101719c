// libs/scheduling-cell/src/services/booking.rs
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use provider_cell::services::schedule::ScheduleService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use travel_cell::services::directions::DirectionsClient;

use crate::models::{
    Appointment, AppointmentStatus, CreateBookingRequest, ProposedBooking, SchedulingError,
    TravelBuffer, UpdateStatusRequest, ValidateBookingRequest, ValidateSchedulingResponse,
};
use crate::services::timeline::DayTimeline;
use crate::services::validator::SchedulingValidator;

/// Booking intake: snapshots the provider's configuration and timeline,
/// runs the validator, and persists admitted bookings. Each call reads
/// its own snapshot - there is no shared mutable state between
/// concurrent validations.
pub struct BookingService {
    config: AppConfig,
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            supabase: SupabaseClient::new(config),
        }
    }

    /// All appointments in the day window around `date`, regardless of
    /// status; the timeline filters to confirmed ones itself.
    pub async fn appointments_for_day(
        &self,
        provider_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let start_of_day = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_day = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&scheduled_at=gte.{}&scheduled_at=lte.{}&order=scheduled_at.asc",
            provider_id,
            start_of_day.to_rfc3339(),
            end_of_day.to_rfc3339(),
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        let appointments = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| SchedulingError::Database(format!("Failed to parse appointments: {}", e)))?;

        Ok(appointments)
    }

    /// The validateScheduling RPC: admit/reject plus the travel buffers
    /// the UI renders around the proposed slot.
    pub async fn validate_booking(
        &self,
        provider_id: &str,
        request: &ValidateBookingRequest,
        auth_token: Option<&str>,
    ) -> Result<ValidateSchedulingResponse, SchedulingError> {
        debug!(
            "Validating booking for provider {} at {}",
            provider_id, request.start
        );

        let schedule_service = ScheduleService::new(&self.config);
        let schedule = schedule_service
            .get_week_schedule(provider_id, auth_token)
            .await?;
        let profile = schedule_service
            .get_travel_profile(provider_id, auth_token)
            .await?;

        let appointments = self
            .appointments_for_day(provider_id, request.start.date_naive(), auth_token)
            .await?;
        let timeline = DayTimeline::new(appointments);

        let proposed = ProposedBooking {
            start: request.start,
            duration_minutes: request.duration_minutes,
            destination_address: request.destination_address.clone(),
        };

        let directions = match DirectionsClient::new(&self.config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Travel estimation unavailable: {}", e);
                None
            }
        };
        let decision = match directions.as_ref() {
            Some(client) => {
                SchedulingValidator::new(client)
                    .validate(&proposed, &schedule, &profile, &timeline)
                    .await
            }
            None => {
                SchedulingValidator::without_estimator()
                    .validate(&proposed, &schedule, &profile, &timeline)
                    .await
            }
        };

        let mut travel_buffers = Vec::new();
        if let (Some(required), Some(origin_address), Some(source)) = (
            decision.travel_buffer_minutes,
            decision.origin_address.clone(),
            decision.origin_source,
        ) {
            travel_buffers.push(TravelBuffer {
                origin_address,
                source,
                travel_minutes: required - profile.grace_minutes,
                grace_minutes: profile.grace_minutes,
                required_buffer_minutes: required,
                enforced: source == crate::models::TravelOriginSource::PreviousAppointment,
            });
        }

        Ok(ValidateSchedulingResponse {
            is_valid: decision.is_valid,
            conflict_message: decision.conflict_message,
            travel_buffers,
        })
    }

    /// Public intake: validate, then persist as a pending appointment.
    /// A commit-time overlap (another booking won the race after our
    /// validation passed) comes back from PostgREST as a 409 and is
    /// surfaced through the same conflict taxonomy as a rejection.
    pub async fn create_booking(
        &self,
        provider_id: &str,
        request: &CreateBookingRequest,
        auth_token: Option<&str>,
    ) -> Result<(Appointment, ValidateSchedulingResponse), SchedulingError> {
        if request.client_name.trim().is_empty() {
            return Err(SchedulingError::InvalidRequest(
                "client_name is required".to_string(),
            ));
        }

        let validation_request = ValidateBookingRequest {
            start: request.start,
            duration_minutes: request.duration_minutes,
            destination_address: request.destination_address.clone(),
        };
        let validation = self
            .validate_booking(provider_id, &validation_request, auth_token)
            .await?;

        if !validation.is_valid {
            let message = validation
                .conflict_message
                .clone()
                .unwrap_or_else(|| "The requested time is not available".to_string());
            return Err(SchedulingError::Rejected(message));
        }

        let booking_data = json!({
            "provider_id": provider_id,
            "client_name": request.client_name,
            "client_phone": request.client_phone,
            "scheduled_at": request.start.to_rfc3339(),
            "duration_minutes": request.duration_minutes,
            "address": request.destination_address,
            "status": AppointmentStatus::Pending,
            "notes": request.notes,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                auth_token,
                Some(booking_data),
                Some(headers),
            )
            .await?;

        let appointment: Appointment = match result.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e)))?,
            None => {
                return Err(SchedulingError::Database(
                    "Failed to create appointment".to_string(),
                ))
            }
        };

        info!(
            "Booking request {} created for provider {} at {}",
            appointment.id, provider_id, appointment.scheduled_at
        );

        Ok((appointment, validation))
    }

    pub async fn get_appointment(
        &self,
        provider_id: &str,
        appointment_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<Appointment, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&provider_id=eq.{}",
            appointment_id, provider_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e))),
            None => Err(SchedulingError::NotFound),
        }
    }

    /// Status transitions. Cancelling a confirmed appointment removes it
    /// from travel-origin consideration on the very next validation,
    /// since timelines are re-read per call.
    pub async fn update_status(
        &self,
        provider_id: &str,
        appointment_id: Uuid,
        request: &UpdateStatusRequest,
        auth_token: Option<&str>,
    ) -> Result<Appointment, SchedulingError> {
        let current = self
            .get_appointment(provider_id, appointment_id, auth_token)
            .await?;

        if !current.status.can_transition_to(request.status) {
            return Err(SchedulingError::InvalidTransition {
                from: current.status,
                to: request.status,
            });
        }

        let update_data = json!({
            "status": request.status,
            "notes": request.reason.as_ref().or(current.notes.as_ref()),
            "updated_at": chrono::Utc::now().to_rfc3339(),
        });

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&provider_id=eq.{}",
            appointment_id, provider_id
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, auth_token, Some(update_data), Some(headers))
            .await?;

        match result.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e))),
            None => Err(SchedulingError::NotFound),
        }
    }
}
