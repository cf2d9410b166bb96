//! Raw events as calendar providers deliver them.
//!
//! [`RawEvent`] mirrors the Google Calendar `events.list` item shape, so it
//! deserializes directly from API responses and from offline event files.
//! Nothing is validated here; see [`crate::normalize`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A start or end as sent by the provider: a date for all-day events, a
/// timestamp for timed ones.
///
/// Well-formed values carry exactly one of the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    /// IANA zone the event was created in, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RawEventTime {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self {
            date_time: Some(dt),
            ..Default::default()
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }

    /// True when only a date is present.
    pub fn is_all_day(&self) -> bool {
        self.date.is_some() && self.date_time.is_none()
    }
}

/// A raw calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start: RawEventTime,
    #[serde(default)]
    pub end: RawEventTime,
    /// `"confirmed"`, `"tentative"` or `"cancelled"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Source calendar; only present in offline event files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

impl RawEvent {
    pub fn new(id: impl Into<String>, start: RawEventTime, end: RawEventTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            ..Default::default()
        }
    }

    /// A timed event.
    pub fn timed(id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(
            id,
            RawEventTime::from_datetime(start),
            RawEventTime::from_datetime(end),
        )
    }

    /// An all-day event; `end` is exclusive.
    pub fn all_day(id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(id, RawEventTime::from_date(start), RawEventTime::from_date(end))
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }

    /// The summary, or `"(No title)"` when it is missing or blank.
    pub fn effective_title(&self) -> &str {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("(No title)")
    }
}
