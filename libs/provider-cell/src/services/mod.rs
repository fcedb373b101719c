pub mod hours;
pub mod schedule;
