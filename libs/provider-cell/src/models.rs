// libs/provider-cell/src/models.rs
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use shared_database::DbError;
use travel_cell::TransportMode;

pub const DEFAULT_BREAK_LABEL: &str = "Break";

// ==============================================================================
// WORKING HOURS MODEL
// ==============================================================================

/// A named block of time inside a working day ("Lunch Break", "School run").
/// Declaration order matters: the first break matching an instant wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub label: Option<String>,
}

impl BreakWindow {
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => DEFAULT_BREAK_LABEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySchedule {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub breaks: Vec<BreakWindow>,
}

/// Per-provider weekly schedule. A day without an entry is fully disabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSchedule {
    days: [Option<DaySchedule>; 7],
}

impl WeekSchedule {
    pub(crate) fn set_day(&mut self, weekday: Weekday, schedule: DaySchedule) {
        self.days[weekday.num_days_from_sunday() as usize] = Some(schedule);
    }

    pub fn day(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.days[weekday.num_days_from_sunday() as usize].as_ref()
    }
}

/// Why an instant or interval is not bookable.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleBlock {
    OutsideHours,
    Break(String),
}

// ==============================================================================
// TRAVEL PROFILE
// ==============================================================================

/// Provider-owned travel settings, read-only to the scheduling validator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelProfile {
    pub home_base_address: Option<String>,
    #[serde(default)]
    pub transportation_mode: TransportMode,
    #[serde(default)]
    pub grace_minutes: i64,
}

impl Default for TravelProfile {
    fn default() -> Self {
        Self {
            home_base_address: None,
            transportation_mode: TransportMode::Driving,
            grace_minutes: 0,
        }
    }
}

// ==============================================================================
// PERSISTENCE / REQUEST MODELS
// ==============================================================================

/// One `working_hours` row as stored in PostgREST. Times travel as
/// "HH:MM" strings and are parsed at the read boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursRecord {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,
    pub enabled: bool,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub breaks: Vec<BreakRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakRecord {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkingHoursRequest {
    pub days: Vec<WorkingHoursRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTravelProfileRequest {
    pub home_base_address: Option<String>,
    #[serde(default)]
    pub transportation_mode: TransportMode,
    #[serde(default)]
    pub grace_minutes: i64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// ConfigurationError: malformed working-hours data. Fatal to the
    /// attempt, surfaced as "please fix your working hours".
    #[error("Working hours configuration is invalid: {0}")]
    InvalidSchedule(String),

    #[error("Travel profile is invalid: {0}")]
    InvalidProfile(String),

    #[error("Provider not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbError> for ProviderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => ProviderError::NotFound,
            other => ProviderError::Database(other.to_string()),
        }
    }
}
