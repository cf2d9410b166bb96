//! Bucketing a flat event list into the week's day columns.

use tracing::trace;

use crate::event::CalendarEvent;
use crate::time::{DAYS_IN_WEEK, Week};

/// Seven per-day buckets, index 0 being the week's first day.
pub type DayBuckets = [Vec<CalendarEvent>; DAYS_IN_WEEK];

/// Groups events by the calendar day they start on.
///
/// Events outside the week are dropped. Order within a bucket follows the
/// input order.
pub fn group_by_day(events: &[CalendarEvent], week: &Week) -> DayBuckets {
    let tz = week.timezone();
    let mut buckets: DayBuckets = Default::default();
    for event in events {
        let date = event.effective_date(&tz);
        match week.day_index(date) {
            Some(index) => buckets[index].push(event.clone()),
            None => trace!(event = %event.id, %date, "event outside week"),
        }
    }
    buckets
}
