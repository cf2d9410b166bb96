//! All-day versus timed lanes.

use crate::event::CalendarEvent;

/// True when the event carries a date and no timestamp.
pub fn is_all_day(event: &CalendarEvent) -> bool {
    event.is_all_day()
}

/// True when the event's start is a timestamp.
pub fn is_timed(event: &CalendarEvent) -> bool {
    event.is_timed()
}

/// One day's events split by rendering lane, input order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayLanes {
    pub all_day: Vec<CalendarEvent>,
    pub timed: Vec<CalendarEvent>,
}

/// Splits a day bucket into its all-day and timed lanes.
pub fn split_day(events: &[CalendarEvent]) -> DayLanes {
    let (all_day, timed) = events.iter().cloned().partition(is_all_day);
    DayLanes { all_day, timed }
}
