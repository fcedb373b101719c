pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentStatus, ProposedBooking, SchedulingDecision, SchedulingError,
    TravelBuffer, TravelOrigin, TravelOriginSource, ValidateSchedulingResponse,
};
pub use services::booking::BookingService;
pub use services::timeline::DayTimeline;
pub use services::validator::SchedulingValidator;
