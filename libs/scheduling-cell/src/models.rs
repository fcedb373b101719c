// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use provider_cell::ProviderError;
use shared_database::DbError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub address: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled_end(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

impl AppointmentStatus {
    /// Transitions a caller may request through the status endpoint.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (*self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

/// A would-be booking under validation. Ephemeral - exists only for the
/// duration of one validation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedBooking {
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub destination_address: Option<String>,
}

impl ProposedBooking {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

// ==============================================================================
// TRAVEL ORIGIN
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TravelOriginSource {
    PreviousAppointment,
    HomeBase,
}

/// Where the provider travels from for a proposed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelOrigin {
    pub address: Option<String>,
    pub source: TravelOriginSource,
    /// End of the preceding commitment; `None` for a home-base origin.
    pub departure_ready_at: Option<DateTime<Utc>>,
}

// ==============================================================================
// VALIDATION RESULT MODELS
// ==============================================================================

/// Outcome of one validation. Business-rule failures are data here,
/// never errors: `is_valid = false` plus a human-readable reason naming
/// the failing rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulingDecision {
    pub is_valid: bool,
    pub conflict_message: Option<String>,
    /// Travel duration plus grace, in minutes. Absent when no destination
    /// was given or the travel lookup failed (unknown, not zero).
    pub travel_buffer_minutes: Option<i64>,
    pub origin_address: Option<String>,
    pub origin_source: Option<TravelOriginSource>,
}

impl SchedulingDecision {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            conflict_message: None,
            travel_buffer_minutes: None,
            origin_address: None,
            origin_source: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            conflict_message: Some(message.into()),
            travel_buffer_minutes: None,
            origin_address: None,
            origin_source: None,
        }
    }
}

/// One entry of the `travel_buffers` list in the validate response.
/// `enforced = false` marks the soft home-base buffer, shown to the user
/// but never grounds for rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelBuffer {
    pub origin_address: String,
    pub source: TravelOriginSource,
    pub travel_minutes: i64,
    pub grace_minutes: i64,
    pub required_buffer_minutes: i64,
    pub enforced: bool,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateBookingRequest {
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub destination_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub client_name: String,
    pub client_phone: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    pub destination_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateSchedulingResponse {
    pub is_valid: bool,
    pub conflict_message: Option<String>,
    pub travel_buffers: Vec<TravelBuffer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
    pub reason: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Validation rejected the booking (working hours, break, overlap,
    /// or travel buffer). Carries the same message the validate RPC
    /// would return as data.
    #[error("{0}")]
    Rejected(String),

    /// Overlap detected at persistence time, after validation passed.
    /// Surfaced through the same conflict taxonomy as `Rejected`.
    #[error("{0}")]
    RaceConflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for SchedulingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(_) => SchedulingError::RaceConflict(
                "The requested time is no longer available".to_string(),
            ),
            DbError::NotFound(_) => SchedulingError::NotFound,
            other => SchedulingError::Database(other.to_string()),
        }
    }
}

impl From<ProviderError> for SchedulingError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidSchedule(msg) => {
                SchedulingError::Configuration(format!("Please fix your working hours: {}", msg))
            }
            ProviderError::InvalidProfile(msg) => SchedulingError::Configuration(msg),
            ProviderError::NotFound => SchedulingError::NotFound,
            ProviderError::Database(msg) => SchedulingError::Database(msg),
        }
    }
}
