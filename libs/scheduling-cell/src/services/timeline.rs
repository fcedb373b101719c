// libs/scheduling-cell/src/services/timeline.rs
use chrono::{DateTime, Utc};

use crate::models::{Appointment, AppointmentStatus, TravelOrigin, TravelOriginSource};

/// One provider's appointments for a day, ordered by start time. Only
/// confirmed appointments participate in overlap and travel-origin
/// decisions - a cancellation drops an appointment out immediately
/// because the timeline is rebuilt from storage on every validation.
#[derive(Debug, Clone)]
pub struct DayTimeline {
    appointments: Vec<Appointment>,
}

impl DayTimeline {
    pub fn new(mut appointments: Vec<Appointment>) -> Self {
        appointments.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { appointments }
    }

    pub fn confirmed(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Confirmed)
    }

    /// First confirmed appointment overlapping `[start, end)`. Shared
    /// boundaries do not overlap: back-to-back bookings are allowed.
    pub fn overlapping(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<&Appointment> {
        self.confirmed()
            .find(|a| a.scheduled_at < end && start < a.scheduled_end())
    }

    /// Travel origin for a booking starting at `proposed_start`: the most
    /// recent confirmed appointment strictly before it, falling back to
    /// the home base when there is none or it has no address. Equal start
    /// times are broken by the higher appointment id.
    pub fn origin_for(
        &self,
        proposed_start: DateTime<Utc>,
        home_base: Option<&str>,
    ) -> TravelOrigin {
        let predecessor = self
            .confirmed()
            .filter(|a| a.scheduled_at < proposed_start)
            .max_by(|a, b| {
                a.scheduled_at
                    .cmp(&b.scheduled_at)
                    .then_with(|| a.id.cmp(&b.id))
            });

        if let Some(appointment) = predecessor {
            if let Some(address) = appointment.address.as_deref() {
                if !address.trim().is_empty() {
                    return TravelOrigin {
                        address: Some(address.to_string()),
                        source: TravelOriginSource::PreviousAppointment,
                        departure_ready_at: Some(appointment.scheduled_end()),
                    };
                }
            }
        }

        TravelOrigin {
            address: home_base.map(|a| a.to_string()),
            source: TravelOriginSource::HomeBase,
            departure_ready_at: None,
        }
    }
}
