//! The full week layout pass.
//!
//! ```text
//! events -> group_by_day -> split_day -> arrange (timed) -> colored days
//!                                      \-> all-day lane  -/
//! ```

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arrange::arrange;
use crate::classify::split_day;
use crate::color::{ColorMemo, ColorResolver};
use crate::error::ConfigError;
use crate::event::{AllDayEvent, CalendarEvent, PositionedEvent};
use crate::grid::GridConfig;
use crate::partition::{DayBuckets, group_by_day};
use crate::time::{Week, parse_timezone};

/// Layout settings: grid geometry plus lane and timezone options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    #[serde(flatten)]
    pub grid: GridConfig,
    /// All-day events shown per day before collapsing into "+N more".
    pub all_day_limit: usize,
    /// IANA timezone used for wall-clock hours and day boundaries.
    pub timezone: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            all_day_limit: 3,
            timezone: "UTC".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.timezone().map(|_| ())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        parse_timezone(&self.timezone)
    }
}

/// One day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    /// All-day events, at most `all_day_limit` of them.
    pub all_day: Vec<AllDayEvent>,
    /// All-day events that did not fit.
    pub all_day_overflow: usize,
    /// Timed events in paint order.
    pub timed: Vec<PositionedEvent>,
}

/// A laid-out week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekLayout {
    pub week: Week,
    /// Events grouped per day, before classification.
    pub buckets: DayBuckets,
    pub days: Vec<DayLayout>,
}

impl WeekLayout {
    /// Lays out `events` for `week`.
    ///
    /// Events outside the week are dropped. One color cache is shared across
    /// the whole pass.
    pub fn compute(
        events: &[CalendarEvent],
        week: Week,
        config: &LayoutConfig,
        colors: &ColorResolver,
    ) -> Self {
        let tz = week.timezone();
        let buckets = group_by_day(events, &week);
        let mut memo = ColorMemo::new(colors);

        let days: Vec<DayLayout> = week
            .dates()
            .into_iter()
            .zip(&buckets)
            .map(|(date, bucket)| {
                let lanes = split_day(bucket);
                let all_day_overflow = lanes.all_day.len().saturating_sub(config.all_day_limit);
                let all_day = lanes
                    .all_day
                    .into_iter()
                    .take(config.all_day_limit)
                    .map(|event| AllDayEvent {
                        color: memo.scheme_for(&event),
                        event,
                    })
                    .collect();
                let timed = arrange(&lanes.timed, &config.grid, &tz, &mut memo);
                DayLayout {
                    date,
                    all_day,
                    all_day_overflow,
                    timed,
                }
            })
            .collect();

        let bucketed: usize = buckets.iter().map(Vec::len).sum();
        debug!(
            week_start = %week.start_date(),
            events = events.len(),
            placed = bucketed,
            outside_week = events.len() - bucketed,
            colors = memo.len(),
            "computed week layout"
        );

        Self {
            week,
            buckets,
            days,
        }
    }

    /// Every positioned timed event, day by day.
    pub fn positioned_events(&self) -> Vec<&PositionedEvent> {
        self.days.iter().flat_map(|day| &day.timed).collect()
    }

    /// Number of events placed anywhere on the grid.
    pub fn event_count(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.timed.len() + day.all_day.len() + day.all_day_overflow)
            .sum()
    }
}
