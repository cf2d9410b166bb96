//! Event types for the week grid.
//!
//! - [`CalendarEvent`]: a validated, provider-agnostic event
//! - [`PositionedEvent`]: a timed event placed on a day column
//! - [`AllDayEvent`]: an all-day event with its resolved color

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::color::ColorScheme;
use crate::error::EventError;
use crate::grid::Pixels;
use crate::time::EventTime;

/// A calendar event ready for layout.
///
/// `start` and `end` are normally of the same kind; [`CalendarEvent::try_new`]
/// enforces that for data coming from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Identifier, unique within one fetch batch.
    pub id: String,
    /// Display title.
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    /// Source calendar, set by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Creates an event with the required fields.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            start,
            end,
            calendar_id: None,
            description: None,
            location: None,
        }
    }

    /// Like [`CalendarEvent::new`], but rejects a start and end of different
    /// kinds.
    pub fn try_new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Result<Self, EventError> {
        let id = id.into();
        if start.is_all_day() != end.is_all_day() {
            return Err(EventError::MismatchedBounds { id });
        }
        Ok(Self::new(id, summary, start, end))
    }

    /// Creates a timed event.
    pub fn timed(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self::new(id, summary, EventTime::DateTime(start), EventTime::DateTime(end))
    }

    /// Creates an all-day event; `end` is the exclusive end date.
    pub fn all_day(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self::new(id, summary, EventTime::AllDay(start), EventTime::AllDay(end))
    }

    /// Sets the source calendar.
    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// True when the start is a date without a time of day.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// True when the start is a precise instant.
    pub fn is_timed(&self) -> bool {
        self.start.is_datetime()
    }

    /// Start and end instants, when both are timestamps.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start.as_datetime()?, self.end.as_datetime()?))
    }

    /// The calendar day the event is filed under: the local date of a timed
    /// start, or the all-day date.
    pub fn effective_date(&self, tz: &Tz) -> NaiveDate {
        self.start.local_date(tz)
    }
}

/// A timed event placed on a day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedEvent {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub top: Pixels,
    pub height: Pixels,
    pub left_offset: Pixels,
    /// Paint order within the day; higher paints above lower.
    pub z_index: usize,
    pub color: ColorScheme,
}

/// An all-day event with its resolved color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllDayEvent {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub color: ColorScheme,
}
