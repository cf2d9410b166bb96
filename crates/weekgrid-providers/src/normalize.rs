//! [`RawEvent`] to [`CalendarEvent`] conversion.
//!
//! This is where malformed provider data stops: a start or end must carry
//! exactly one of a date or a timestamp, and both must be of the same kind.
//! Events that fail are logged and left out.

use tracing::warn;
use weekgrid_core::{Bound, CalendarEvent, EventError, EventTime};

use crate::raw_event::{RawEvent, RawEventTime};

fn convert_time(id: &str, bound: Bound, raw: &RawEventTime) -> Result<EventTime, EventError> {
    EventTime::from_parts(id, bound, raw.date, raw.date_time)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Validates a raw event and tags it with `calendar_id`.
pub fn normalize_event(raw: &RawEvent, calendar_id: &str) -> Result<CalendarEvent, EventError> {
    let start = convert_time(&raw.id, Bound::Start, &raw.start)?;
    let end = convert_time(&raw.id, Bound::End, &raw.end)?;

    let mut event = CalendarEvent::try_new(&raw.id, raw.effective_title(), start, end)?
        .with_calendar_id(calendar_id);
    if let Some(location) = non_blank(&raw.location) {
        event = event.with_location(location);
    }
    if let Some(description) = non_blank(&raw.description) {
        event = event.with_description(description);
    }
    Ok(event)
}

/// Normalizes a batch from one calendar, dropping cancelled and malformed
/// events.
pub fn normalize_events(raw_events: &[RawEvent], calendar_id: &str) -> Vec<CalendarEvent> {
    raw_events
        .iter()
        .filter(|raw| !raw.is_cancelled())
        .filter_map(|raw| match normalize_event(raw, calendar_id) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(calendar = calendar_id, error = %err, "skipping malformed event");
                None
            }
        })
        .collect()
}
