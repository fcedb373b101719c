pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    BreakWindow, DaySchedule, ProviderError, ScheduleBlock, TravelProfile, WeekSchedule,
    WorkingHoursRecord,
};
pub use services::schedule::ScheduleService;
