// libs/scheduling-cell/tests/validator_test.rs
//
// Core admit/reject decision procedure, exercised with stub estimators.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use provider_cell::models::{BreakRecord, TravelProfile, WeekSchedule, WorkingHoursRecord};
use scheduling_cell::{
    Appointment, AppointmentStatus, DayTimeline, ProposedBooking, SchedulingValidator,
    TravelOriginSource,
};
use travel_cell::{TransportMode, TravelError, TravelEstimate, TravelEstimator};

// ==============================================================================
// FIXTURES
// ==============================================================================

struct StubEstimator {
    duration_minutes: i64,
}

#[async_trait]
impl TravelEstimator for StubEstimator {
    async fn estimate(
        &self,
        _origin: &str,
        _destination: &str,
        _mode: TransportMode,
    ) -> Result<TravelEstimate, TravelError> {
        Ok(TravelEstimate {
            duration_minutes: self.duration_minutes,
            distance_meters: self.duration_minutes * 400,
        })
    }
}

struct FailingEstimator;

#[async_trait]
impl TravelEstimator for FailingEstimator {
    async fn estimate(
        &self,
        _origin: &str,
        _destination: &str,
        _mode: TransportMode,
    ) -> Result<TravelEstimate, TravelError> {
        Err(TravelError::Api {
            message: "geocoding failed".to_string(),
        })
    }
}

/// Panics when called - proves the travel check was skipped.
struct UnreachableEstimator;

#[async_trait]
impl TravelEstimator for UnreachableEstimator {
    async fn estimate(
        &self,
        _origin: &str,
        _destination: &str,
        _mode: TransportMode,
    ) -> Result<TravelEstimate, TravelError> {
        panic!("estimator must not be called");
    }
}

/// 2025-06-03 is a Tuesday.
fn tue(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 3, hour, minute, 0).unwrap()
}

/// Tuesday 09:00-17:00 with a 12:00-13:00 lunch break.
fn tuesday_schedule() -> WeekSchedule {
    WeekSchedule::from_records(&[WorkingHoursRecord {
        day_of_week: 2,
        enabled: true,
        start_time: "09:00".to_string(),
        end_time: "17:00".to_string(),
        breaks: vec![BreakRecord {
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            label: Some("Lunch Break".to_string()),
        }],
    }])
    .unwrap()
}

fn profile(grace_minutes: i64) -> TravelProfile {
    TravelProfile {
        home_base_address: Some("123 Main St".to_string()),
        transportation_mode: TransportMode::Driving,
        grace_minutes,
    }
}

fn confirmed_at(start: DateTime<Utc>, duration: i32, address: Option<&str>) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        provider_id: Uuid::nil(),
        client_name: "Existing Client".to_string(),
        scheduled_at: start,
        duration_minutes: duration,
        address: address.map(|a| a.to_string()),
        status: AppointmentStatus::Confirmed,
        notes: None,
        created_at: start,
        updated_at: start,
    }
}

fn proposed(start: DateTime<Utc>, duration: i32, destination: Option<&str>) -> ProposedBooking {
    ProposedBooking {
        start,
        duration_minutes: duration,
        destination_address: destination.map(|d| d.to_string()),
    }
}

// ==============================================================================
// WORKING-HOURS AND OVERLAP CHECKS
// ==============================================================================

#[tokio::test]
async fn rejects_booking_outside_working_hours() {
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(&proposed(tue(7, 0), 30, None), &tuesday_schedule(), &profile(0), &timeline)
        .await;

    assert!(!decision.is_valid);
    let message = decision.conflict_message.unwrap();
    assert!(message.contains("working hours"), "got: {}", message);
}

#[tokio::test]
async fn rejects_booking_during_break_naming_the_label() {
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(&proposed(tue(12, 15), 30, None), &tuesday_schedule(), &profile(0), &timeline)
        .await;

    assert!(!decision.is_valid);
    assert!(decision.conflict_message.unwrap().contains("Lunch Break"));
}

#[tokio::test]
async fn rejects_booking_spanning_into_a_break() {
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(&proposed(tue(11, 30), 60, None), &tuesday_schedule(), &profile(0), &timeline)
        .await;

    assert!(!decision.is_valid);
    assert!(decision.conflict_message.unwrap().contains("Lunch Break"));
}

#[tokio::test]
async fn rejects_overlap_but_allows_back_to_back() {
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![confirmed_at(tue(14, 0), 60, None)]);
    let schedule = tuesday_schedule();

    let overlapping = validator
        .validate(&proposed(tue(14, 30), 60, None), &schedule, &profile(0), &timeline)
        .await;
    assert!(!overlapping.is_valid);
    assert!(overlapping.conflict_message.unwrap().contains("14:00"));

    let back_to_back = validator
        .validate(&proposed(tue(15, 0), 60, None), &schedule, &profile(0), &timeline)
        .await;
    assert!(back_to_back.is_valid);
}

#[tokio::test]
async fn rejects_non_positive_duration() {
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(&proposed(tue(10, 0), 0, None), &tuesday_schedule(), &profile(0), &timeline)
        .await;

    assert!(!decision.is_valid);
}

#[tokio::test]
async fn rejects_interval_crossing_midnight() {
    let schedule = WeekSchedule::from_records(&[WorkingHoursRecord {
        day_of_week: 2,
        enabled: true,
        start_time: "09:00".to_string(),
        end_time: "23:59".to_string(),
        breaks: vec![],
    }])
    .unwrap();
    let validator = SchedulingValidator::without_estimator();
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(&proposed(tue(23, 30), 60, None), &schedule, &profile(0), &timeline)
        .await;

    assert!(!decision.is_valid);
}

// ==============================================================================
// TRAVEL CHECK
// ==============================================================================

#[tokio::test]
async fn travel_check_skipped_without_destination() {
    let estimator = UnreachableEstimator;
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);

    let decision = validator
        .validate(&proposed(tue(11, 0), 30, None), &tuesday_schedule(), &profile(0), &timeline)
        .await;

    assert!(decision.is_valid);
    assert_eq!(decision.travel_buffer_minutes, None);
}

#[tokio::test]
async fn estimator_failure_fails_open_and_omits_travel_fields() {
    let estimator = FailingEstimator;
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);

    let decision = validator
        .validate(
            &proposed(tue(10, 35), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile(0),
            &timeline,
        )
        .await;

    // A failed lookup means "unknown", never "zero": no buffer enforced,
    // no travel line shown.
    assert!(decision.is_valid);
    assert_eq!(decision.travel_buffer_minutes, None);
    assert_eq!(decision.origin_address, None);
}

#[tokio::test]
async fn rejects_when_travel_buffer_does_not_fit() {
    let estimator = StubEstimator { duration_minutes: 45 };
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);

    // Previous job ends 10:30; 45 travel + 5 grace needs 11:20
    let decision = validator
        .validate(
            &proposed(tue(11, 0), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile(5),
            &timeline,
        )
        .await;

    assert!(!decision.is_valid);
    let message = decision.conflict_message.unwrap();
    assert!(message.contains("100 Oak St"), "got: {}", message);
    assert!(message.contains("50"), "got: {}", message);
}

#[tokio::test]
async fn accepts_when_start_is_exactly_at_the_required_buffer() {
    let estimator = StubEstimator { duration_minutes: 25 };
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);

    // Previous job ends 10:30; 25 + 5 grace = earliest start 11:00
    let decision = validator
        .validate(
            &proposed(tue(11, 0), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile(5),
            &timeline,
        )
        .await;

    assert!(decision.is_valid);
    assert_eq!(decision.travel_buffer_minutes, Some(30));
}

#[tokio::test]
async fn home_base_buffer_is_informational_only() {
    let estimator = StubEstimator { duration_minutes: 240 };
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![]);

    let decision = validator
        .validate(
            &proposed(tue(9, 30), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile(0),
            &timeline,
        )
        .await;

    // No prior commitment to conflict with: huge travel time still admits
    assert!(decision.is_valid);
    assert_eq!(decision.travel_buffer_minutes, Some(240));
    assert_eq!(decision.origin_address.as_deref(), Some("123 Main St"));
    assert_eq!(decision.origin_source, Some(TravelOriginSource::HomeBase));
}

#[tokio::test]
async fn no_home_base_and_no_predecessor_skips_travel_check() {
    let estimator = UnreachableEstimator;
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![]);
    let mut profile = profile(0);
    profile.home_base_address = None;

    let decision = validator
        .validate(
            &proposed(tue(11, 0), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile,
            &timeline,
        )
        .await;

    assert!(decision.is_valid);
    assert_eq!(decision.travel_buffer_minutes, None);
}

// ==============================================================================
// END-TO-END SCENARIO AND DETERMINISM
// ==============================================================================

#[tokio::test]
async fn end_to_end_scenario_admits_with_travel_buffer() {
    let estimator = StubEstimator { duration_minutes: 20 };
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);
    let profile = profile(5);

    let decision = validator
        .validate(
            &proposed(tue(11, 0), 30, Some("456 Elm St")),
            &tuesday_schedule(),
            &profile,
            &timeline,
        )
        .await;

    assert!(decision.is_valid);
    assert_eq!(decision.conflict_message, None);
    assert_eq!(decision.origin_address.as_deref(), Some("100 Oak St"));
    assert_eq!(decision.travel_buffer_minutes, Some(25));
    assert_eq!(
        decision.origin_source,
        Some(TravelOriginSource::PreviousAppointment)
    );
}

#[tokio::test]
async fn identical_inputs_produce_identical_decisions() {
    let estimator = StubEstimator { duration_minutes: 20 };
    let validator = SchedulingValidator::new(&estimator);
    let timeline = DayTimeline::new(vec![confirmed_at(tue(10, 0), 30, Some("100 Oak St"))]);
    let schedule = tuesday_schedule();
    let profile = profile(5);
    let booking = proposed(tue(11, 0), 30, Some("456 Elm St"));

    let first = validator.validate(&booking, &schedule, &profile, &timeline).await;
    let second = validator.validate(&booking, &schedule, &profile, &timeline).await;

    assert_eq!(first, second);
}
