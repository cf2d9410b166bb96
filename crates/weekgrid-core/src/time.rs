//! Time types for calendar events.
//!
//! This module provides [`EventTime`] for event start/end times (either a
//! precise instant or an all-day date), [`TimeWindow`] for fetch ranges, and
//! [`Week`], the Monday-anchored seven-day span that the grid displays.

use std::cmp::Ordering;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Bound, ConfigError, EventError};

/// Number of day columns in the grid.
pub const DAYS_IN_WEEK: usize = 7;

/// The time of a calendar event boundary.
///
/// - **DateTime**: a specific instant, stored in UTC
/// - **AllDay**: a calendar date without a time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific instant, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates an `EventTime::DateTime` from a UTC instant.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates an `EventTime::DateTime` from an instant in any timezone.
    pub fn from_local<Z: TimeZone>(dt: DateTime<Z>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }

    /// Creates an `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Builds an event time from the optional date / timestamp pair that
    /// calendar providers send.
    ///
    /// Exactly one of the two must be present.
    pub fn from_parts(
        id: &str,
        bound: Bound,
        date: Option<NaiveDate>,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<Self, EventError> {
        match (date, date_time) {
            (None, Some(dt)) => Ok(Self::DateTime(dt)),
            (Some(d), None) => Ok(Self::AllDay(d)),
            (None, None) => Err(EventError::MissingTime {
                id: id.to_string(),
                bound,
            }),
            (Some(_), Some(_)) => Err(EventError::AmbiguousTime {
                id: id.to_string(),
                bound,
            }),
        }
    }

    /// Returns `true` if this is an all-day date.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns `true` if this is a precise instant.
    pub fn is_datetime(&self) -> bool {
        matches!(self, Self::DateTime(_))
    }

    /// Returns the instant if this is a `DateTime`.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::AllDay(_) => None,
        }
    }

    /// Returns the date if this is an `AllDay`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::AllDay(d) => Some(*d),
            Self::DateTime(_) => None,
        }
    }

    /// Converts to a UTC instant for ordering.
    ///
    /// All-day dates compare at midnight UTC.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns the calendar date this time falls on in `tz`.
    ///
    /// All-day dates are returned unchanged.
    pub fn local_date(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.with_timezone(tz).date_naive(),
            Self::AllDay(date) => *date,
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}

/// A half-open `[start, end)` interval in UTC, used as a fetch range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Returns the duration of this window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if an instant falls within this window.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }
}

/// Resolves a local wall-clock time to a UTC instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times in
/// a DST gap are read with the offset in force before the gap, which moves
/// them forward past it.
pub(crate) fn local_to_utc(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = naive - Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            (naive - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
        }
    }
}

/// Parses an IANA timezone name such as `"Europe/Madrid"`.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

/// A seven-day span shown by the grid, evaluated in one timezone.
///
/// The week is an opaque window: the engine never reads the clock, so
/// callers pick the week (usually via [`Week::containing`] and
/// [`Week::checked_offset`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    start: NaiveDate,
    timezone: Tz,
}

impl Week {
    /// Creates a week starting on `start` (normally a Monday).
    pub fn starting(start: NaiveDate, timezone: Tz) -> Self {
        Self { start, timezone }
    }

    /// Returns the Monday-anchored week containing `date`.
    pub fn containing(date: NaiveDate, timezone: Tz) -> Self {
        let back = i64::from(date.weekday().num_days_from_monday());
        Self::starting(date - Duration::days(back), timezone)
    }

    /// Returns the Monday-anchored week containing the instant `now`,
    /// as seen in `timezone`.
    pub fn containing_instant(now: DateTime<Utc>, timezone: Tz) -> Self {
        Self::containing(now.with_timezone(&timezone).date_naive(), timezone)
    }

    /// Returns the week `weeks` weeks before (negative) or after this one,
    /// or `None` when that falls outside the supported date range.
    pub fn checked_offset(&self, weeks: i64) -> Option<Self> {
        let shift = Duration::try_weeks(weeks)?;
        let start = self.start.checked_add_signed(shift)?;
        Some(Self::starting(start, self.timezone))
    }

    /// First day of the week.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week.
    pub fn end_date(&self) -> NaiveDate {
        self.start + Duration::days(DAYS_IN_WEEK as i64 - 1)
    }

    /// The timezone used for wall-clock hours and calendar days.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The date of each column, first to last.
    pub fn dates(&self) -> [NaiveDate; DAYS_IN_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// Returns the column index of `date`, or `None` when it lies outside
    /// the week.
    ///
    /// This is a calendar-day difference, so DST transitions inside the week
    /// never shift an event into a neighbouring column.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = date.signed_duration_since(self.start).num_days();
        usize::try_from(offset)
            .ok()
            .filter(|&index| index < DAYS_IN_WEEK)
    }

    /// The instant the week begins: local midnight of the first day.
    pub fn start_instant(&self) -> DateTime<Utc> {
        local_to_utc(self.start.and_time(NaiveTime::MIN), &self.timezone)
    }

    /// The UTC fetch window covering the whole week, up to local midnight
    /// after the last day.
    pub fn time_window(&self) -> TimeWindow {
        let after = self.start + Duration::days(DAYS_IN_WEEK as i64);
        TimeWindow::new(
            self.start_instant(),
            local_to_utc(after.and_time(NaiveTime::MIN), &self.timezone),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod event_time {
        use super::*;

        #[test]
        fn from_parts_accepts_exactly_one() {
            let dt = utc(2025, 2, 3, 9, 0, 0);
            assert_eq!(
                EventTime::from_parts("e", Bound::Start, None, Some(dt)),
                Ok(EventTime::DateTime(dt))
            );
            assert_eq!(
                EventTime::from_parts("e", Bound::End, Some(date(2025, 2, 3)), None),
                Ok(EventTime::AllDay(date(2025, 2, 3)))
            );
        }

        #[test]
        fn from_parts_rejects_neither_and_both() {
            let err = EventTime::from_parts("e", Bound::Start, None, None).unwrap_err();
            assert!(matches!(err, EventError::MissingTime { bound: Bound::Start, .. }));

            let err = EventTime::from_parts(
                "e",
                Bound::End,
                Some(date(2025, 2, 3)),
                Some(utc(2025, 2, 3, 9, 0, 0)),
            )
            .unwrap_err();
            assert!(matches!(err, EventError::AmbiguousTime { bound: Bound::End, .. }));
        }

        #[test]
        fn accessors() {
            let dt = EventTime::from_utc(utc(2025, 2, 3, 9, 0, 0));
            assert!(dt.is_datetime());
            assert!(!dt.is_all_day());
            assert_eq!(dt.as_date(), None);

            let ad = EventTime::from_date(date(2025, 2, 3));
            assert!(ad.is_all_day());
            assert_eq!(ad.as_datetime(), None);
            assert_eq!(ad.to_utc_datetime(), utc(2025, 2, 3, 0, 0, 0));
        }

        #[test]
        fn local_date_follows_timezone() {
            // 23:30 UTC on Sunday is already Monday in Madrid.
            let et = EventTime::from_utc(utc(2025, 2, 2, 23, 30, 0));
            assert_eq!(et.local_date(&Tz::UTC), date(2025, 2, 2));
            assert_eq!(et.local_date(&Tz::Europe__Madrid), date(2025, 2, 3));
        }

        #[test]
        fn ordering() {
            let morning = EventTime::from_utc(utc(2025, 2, 3, 9, 0, 0));
            let noon = EventTime::from_utc(utc(2025, 2, 3, 12, 0, 0));
            let all_day = EventTime::from_date(date(2025, 2, 3));
            assert!(all_day < morning);
            assert!(morning < noon);
        }

        #[test]
        fn serde_roundtrip() {
            let et = EventTime::from_utc(utc(2025, 2, 3, 9, 0, 0));
            let json = serde_json::to_string(&et).unwrap();
            assert_eq!(json, r#"{"type":"DateTime","value":"2025-02-03T09:00:00Z"}"#);
            let parsed: EventTime = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, et);
        }
    }

    mod week {
        use super::*;

        #[test]
        fn containing_anchors_on_monday() {
            // 2025-02-05 is a Wednesday.
            let week = Week::containing(date(2025, 2, 5), Tz::UTC);
            assert_eq!(week.start_date(), date(2025, 2, 3));
            assert_eq!(week.end_date(), date(2025, 2, 9));

            // Sunday belongs to the week that started six days earlier.
            let week = Week::containing(date(2025, 2, 9), Tz::UTC);
            assert_eq!(week.start_date(), date(2025, 2, 3));

            let week = Week::containing(date(2025, 2, 3), Tz::UTC);
            assert_eq!(week.start_date(), date(2025, 2, 3));
        }

        #[test]
        fn containing_instant_uses_local_date() {
            // Sunday 23:30 UTC is Monday 00:30 in Madrid.
            let now = utc(2025, 2, 9, 23, 30, 0);
            assert_eq!(
                Week::containing_instant(now, Tz::UTC).start_date(),
                date(2025, 2, 3)
            );
            assert_eq!(
                Week::containing_instant(now, Tz::Europe__Madrid).start_date(),
                date(2025, 2, 10)
            );
        }

        #[test]
        fn offset_moves_whole_weeks() {
            let week = Week::starting(date(2025, 2, 3), Tz::UTC);
            assert_eq!(week.checked_offset(1).unwrap().start_date(), date(2025, 2, 10));
            assert_eq!(week.checked_offset(-1).unwrap().start_date(), date(2025, 1, 27));
            assert_eq!(week.checked_offset(0), Some(week));
        }

        #[test]
        fn offset_out_of_range_is_none() {
            let week = Week::starting(date(2025, 2, 3), Tz::UTC);
            assert_eq!(week.checked_offset(100_000_000), None);
            assert_eq!(week.checked_offset(i64::MIN), None);
        }

        #[test]
        fn dates_cover_seven_days() {
            let week = Week::starting(date(2025, 2, 3), Tz::UTC);
            let dates = week.dates();
            assert_eq!(dates[0], date(2025, 2, 3));
            assert_eq!(dates[6], date(2025, 2, 9));
        }

        #[test]
        fn day_index_bounds() {
            let week = Week::starting(date(2025, 2, 3), Tz::UTC);
            assert_eq!(week.day_index(date(2025, 2, 3)), Some(0));
            assert_eq!(week.day_index(date(2025, 2, 9)), Some(6));
            assert_eq!(week.day_index(date(2025, 2, 2)), None);
            assert_eq!(week.day_index(date(2025, 2, 10)), None);
        }

        #[test]
        fn day_index_is_stable_across_dst() {
            // Europe/Madrid springs forward on 2025-03-30 (a Sunday).
            let week = Week::starting(date(2025, 3, 24), Tz::Europe__Madrid);
            assert_eq!(week.day_index(date(2025, 3, 30)), Some(6));
            assert_eq!(week.day_index(date(2025, 3, 31)), None);
        }

        #[test]
        fn time_window_spans_local_midnights() {
            let week = Week::starting(date(2025, 2, 3), Tz::Europe__Madrid);
            let window = week.time_window();
            assert_eq!(window.start, utc(2025, 2, 2, 23, 0, 0));
            assert_eq!(window.end, utc(2025, 2, 9, 23, 0, 0));
            assert_eq!(window.duration(), Duration::days(7));
            assert!(window.contains(utc(2025, 2, 2, 23, 0, 0)));
            assert!(!window.contains(utc(2025, 2, 9, 23, 0, 0)));
        }

        #[test]
        fn time_window_shrinks_over_spring_forward() {
            let week = Week::starting(date(2025, 3, 24), Tz::Europe__Madrid);
            assert_eq!(
                week.time_window().duration(),
                Duration::days(7) - Duration::hours(1)
            );
        }

        #[test]
        fn serde_roundtrip() {
            let week = Week::starting(date(2025, 2, 3), Tz::America__New_York);
            let json = serde_json::to_string(&week).unwrap();
            assert_eq!(json, r#"{"start":"2025-02-03","timezone":"America/New_York"}"#);
            let parsed: Week = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, week);
        }
    }

    #[test]
    fn parse_timezone_names() {
        assert_eq!(parse_timezone("Europe/Madrid"), Ok(Tz::Europe__Madrid));
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(ConfigError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn local_to_utc_handles_gaps() {
        // 02:30 does not exist in Madrid on 2025-03-30.
        let naive = date(2025, 3, 30).and_hms_opt(2, 30, 0).unwrap();
        let resolved = local_to_utc(naive, &Tz::Europe__Madrid);
        assert_eq!(resolved, utc(2025, 3, 30, 1, 30, 0));
    }

    #[test]
    fn week_starting_in_midnight_gap() {
        // Santiago skips 00:00-01:00 on 2024-09-08; the day starts at 01:00 -03.
        let week = Week::starting(date(2024, 9, 8), Tz::America__Santiago);
        assert_eq!(week.start_instant(), utc(2024, 9, 8, 4, 0, 0));
        assert_eq!(week.time_window().start, utc(2024, 9, 8, 4, 0, 0));
    }
}
