// libs/scheduling-cell/src/services/validator.rs
//
// The core admit/reject decision for a proposed booking. Checks run in
// order - working hours, timeline overlap, travel buffer - and the first
// failing check names the rejection. Pure but for the single travel
// lookup; identical inputs always produce an identical decision.

use chrono::{Datelike, Duration};
use tracing::{debug, warn};

use provider_cell::models::{ScheduleBlock, TravelProfile, WeekSchedule};
use travel_cell::services::directions::TravelEstimator;

use crate::models::{ProposedBooking, SchedulingDecision, TravelOriginSource};
use crate::services::timeline::DayTimeline;

pub struct SchedulingValidator<'a> {
    estimator: Option<&'a dyn TravelEstimator>,
}

impl<'a> SchedulingValidator<'a> {
    pub fn new(estimator: &'a dyn TravelEstimator) -> Self {
        Self {
            estimator: Some(estimator),
        }
    }

    /// Validator with no travel estimator available. The travel check is
    /// skipped entirely, same as a failed lookup.
    pub fn without_estimator() -> Self {
        Self { estimator: None }
    }

    pub async fn validate(
        &self,
        proposed: &ProposedBooking,
        schedule: &WeekSchedule,
        profile: &TravelProfile,
        timeline: &DayTimeline,
    ) -> SchedulingDecision {
        if proposed.duration_minutes <= 0 {
            return SchedulingDecision::rejected("Appointment duration must be positive");
        }

        let start = proposed.start;
        let end = proposed.end();

        // 1. Working hours. Day schedules never span midnight, so an
        //    interval crossing it is outside hours by definition.
        if end.date_naive() != start.date_naive() {
            return SchedulingDecision::rejected(format!(
                "{} to {} is outside your working hours",
                start.format("%a %H:%M"),
                end.format("%a %H:%M"),
            ));
        }

        let weekday = start.weekday();
        match schedule.check_interval(weekday, start.time(), end.time()) {
            Some(ScheduleBlock::OutsideHours) => {
                return SchedulingDecision::rejected(format!(
                    "{} to {} is outside your working hours",
                    start.format("%a %H:%M"),
                    end.format("%H:%M"),
                ));
            }
            Some(ScheduleBlock::Break(label)) => {
                return SchedulingDecision::rejected(format!(
                    "Requested time falls during a scheduled break: {}",
                    label
                ));
            }
            None => {}
        }

        // 2. Timeline overlap.
        if let Some(existing) = timeline.overlapping(start, end) {
            return SchedulingDecision::rejected(format!(
                "Conflicts with an existing appointment at {}",
                existing.scheduled_at.format("%H:%M")
            ));
        }

        // 3. Travel buffer, only when the booking has a destination.
        let mut decision = SchedulingDecision::valid();

        let destination = match proposed.destination_address.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => return decision,
        };

        let origin = timeline.origin_for(start, profile.home_base_address.as_deref());
        let origin_address = match origin.address.as_deref() {
            Some(a) => a,
            None => {
                debug!("No travel origin available, skipping travel check");
                return decision;
            }
        };

        let estimate = match self.estimator {
            Some(estimator) => {
                estimator
                    .estimate(origin_address, destination, profile.transportation_mode)
                    .await
            }
            None => {
                debug!("No travel estimator configured, skipping travel check");
                return decision;
            }
        };

        match estimate {
            Ok(estimate) => {
                let required_buffer = estimate.duration_minutes + profile.grace_minutes;

                if origin.source == TravelOriginSource::PreviousAppointment {
                    if let Some(previous_end) = origin.departure_ready_at {
                        let earliest_start = previous_end + Duration::minutes(required_buffer);
                        if start < earliest_start {
                            return SchedulingDecision::rejected(format!(
                                "Not enough travel time from {}: {} minutes needed after the {} appointment",
                                origin_address,
                                required_buffer,
                                previous_end.format("%H:%M"),
                            ));
                        }
                    }
                }
                // Home-base origin: no prior commitment to conflict with,
                // the buffer is informational only.

                decision.travel_buffer_minutes = Some(required_buffer);
                decision.origin_address = Some(origin_address.to_string());
                decision.origin_source = Some(origin.source);
                decision
            }
            Err(e) => {
                // Fail-open: travel time is unknown, not zero. No buffer
                // is enforced and no travel fields are populated.
                warn!("Travel time lookup failed, skipping travel check: {}", e);
                decision
            }
        }
    }
}
