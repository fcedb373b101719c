// libs/provider-cell/src/services/hours.rs
//
// Pure working-hours logic: open intervals, break labels, interval checks.
// Persistence lives in schedule.rs; everything here operates on parsed
// snapshots and has no side effects.

use chrono::{NaiveTime, Timelike, Weekday};
use tracing::debug;

use crate::models::{
    BreakWindow, DaySchedule, ProviderError, ScheduleBlock, WeekSchedule, WorkingHoursRecord,
};

/// Stored times are "HH:MM"; "HH:MM:SS" is tolerated for older rows.
pub fn parse_schedule_time(raw: &str) -> Result<NaiveTime, ProviderError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ProviderError::InvalidSchedule(format!("unparseable time \"{}\"", raw)))
}

impl BreakWindow {
    /// End of the span this break actually blocks. A break ending on the
    /// hour frees that instant; a break ending mid-hour keeps blocking
    /// through the rest of that hour slot.
    pub fn effective_end(&self) -> NaiveTime {
        if self.end.minute() == 0 && self.end.second() == 0 {
            return self.end;
        }
        NaiveTime::from_hms_opt(self.end.hour() + 1, 0, 0)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).unwrap())
    }

    /// Whether this break blocks the given instant.
    pub fn blocks(&self, instant: NaiveTime) -> bool {
        self.start <= instant && instant < self.effective_end()
    }
}

impl DaySchedule {
    /// Within working-hours bounds. Breaks do not affect this check;
    /// they are reported separately via `break_label_at`.
    pub fn contains(&self, instant: NaiveTime) -> bool {
        self.enabled && self.start <= instant && instant <= self.end
    }

    /// Label of the first declared break blocking the instant. Instants
    /// outside working hours never carry a label, even when a configured
    /// break spans them - the hours check runs first.
    pub fn break_label_at(&self, instant: NaiveTime) -> Option<&str> {
        if !self.contains(instant) {
            return None;
        }
        self.breaks
            .iter()
            .find(|b| b.blocks(instant))
            .map(|b| b.display_label())
    }

    /// Working hours minus break windows, in order.
    pub fn open_intervals(&self) -> Vec<(NaiveTime, NaiveTime)> {
        if !self.enabled {
            return vec![];
        }

        let mut open = vec![(self.start, self.end)];
        for b in &self.breaks {
            let blocked_start = b.start;
            let blocked_end = b.effective_end();
            if blocked_start >= blocked_end {
                continue;
            }

            let mut next = Vec::with_capacity(open.len() + 1);
            for (s, e) in open {
                if blocked_end <= s || blocked_start >= e {
                    next.push((s, e));
                    continue;
                }
                if blocked_start > s {
                    next.push((s, blocked_start));
                }
                if blocked_end < e {
                    next.push((blocked_end, e));
                }
            }
            open = next;
        }
        open
    }

    /// First reason `[start, end)` is not bookable, or `None` when the
    /// whole interval is open. Bounds are checked before breaks, so a
    /// break spilling past the working-hours end never surfaces a label.
    pub fn check_interval(&self, start: NaiveTime, end: NaiveTime) -> Option<ScheduleBlock> {
        if !self.enabled {
            return Some(ScheduleBlock::OutsideHours);
        }
        if start < self.start || end > self.end {
            return Some(ScheduleBlock::OutsideHours);
        }
        self.breaks
            .iter()
            .find(|b| b.start < end && start < b.effective_end())
            .map(|b| ScheduleBlock::Break(b.display_label().to_string()))
    }
}

impl WeekSchedule {
    /// Parse stored rows into a weekly schedule. Missing days are fully
    /// disabled; malformed rows are a configuration error, never a
    /// silent default.
    pub fn from_records(records: &[WorkingHoursRecord]) -> Result<Self, ProviderError> {
        let mut schedule = WeekSchedule::default();

        for record in records {
            let weekday = match record.day_of_week {
                0 => Weekday::Sun,
                1 => Weekday::Mon,
                2 => Weekday::Tue,
                3 => Weekday::Wed,
                4 => Weekday::Thu,
                5 => Weekday::Fri,
                6 => Weekday::Sat,
                other => {
                    return Err(ProviderError::InvalidSchedule(format!(
                        "day_of_week must be 0-6, got {}",
                        other
                    )))
                }
            };

            let start = parse_schedule_time(&record.start_time)?;
            let end = parse_schedule_time(&record.end_time)?;
            if record.enabled && start >= end {
                return Err(ProviderError::InvalidSchedule(format!(
                    "{:?}: start {} is not before end {}",
                    weekday, record.start_time, record.end_time
                )));
            }

            let breaks = record
                .breaks
                .iter()
                .map(|b| {
                    Ok(BreakWindow {
                        start: parse_schedule_time(&b.start_time)?,
                        end: parse_schedule_time(&b.end_time)?,
                        label: b.label.clone(),
                    })
                })
                .collect::<Result<Vec<_>, ProviderError>>()?;

            schedule.set_day(
                weekday,
                DaySchedule {
                    enabled: record.enabled,
                    start,
                    end,
                    breaks,
                },
            );
        }

        debug!("Parsed week schedule from {} rows", records.len());
        Ok(schedule)
    }

    pub fn is_within_working_hours(&self, weekday: Weekday, instant: NaiveTime) -> bool {
        self.day(weekday).is_some_and(|d| d.contains(instant))
    }

    pub fn break_label_at(&self, weekday: Weekday, instant: NaiveTime) -> Option<&str> {
        self.day(weekday).and_then(|d| d.break_label_at(instant))
    }

    pub fn open_intervals(&self, weekday: Weekday) -> Vec<(NaiveTime, NaiveTime)> {
        self.day(weekday)
            .map(|d| d.open_intervals())
            .unwrap_or_default()
    }

    pub fn check_interval(
        &self,
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Option<ScheduleBlock> {
        match self.day(weekday) {
            Some(day) => day.check_interval(start, end),
            None => Some(ScheduleBlock::OutsideHours),
        }
    }
}
