//! Vertical time math for the week grid.
//!
//! A day column spans `[start_hour, end_hour)` of local wall-clock time. Event
//! instants are mapped onto that column as pixel offsets, rounded to a fixed
//! granularity and clamped to the column edges.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A length in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pixels(pub f64);

impl Pixels {
    pub const ZERO: Pixels = Pixels(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Pixels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Geometry of a day column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First hour shown (inclusive).
    pub start_hour: u32,
    /// Hour the column ends at (exclusive).
    pub end_hour: u32,
    /// Vertical scale.
    pub pixels_per_hour: f64,
    /// Granularity `top` and `height` are rounded to.
    pub rounding_minutes: u32,
    /// Smallest height an event is drawn with.
    pub min_height: f64,
    /// Horizontal stride between stacked overlapping events.
    pub stack_unit: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 23,
            pixels_per_hour: 24.0,
            rounding_minutes: 15,
            min_height: 6.0,
            stack_unit: 8.0,
        }
    }
}

impl GridConfig {
    /// Checks that the geometry describes a drawable column.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(ConfigError::InvalidHours {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        if !(self.pixels_per_hour.is_finite() && self.pixels_per_hour > 0.0) {
            return Err(ConfigError::InvalidScale(self.pixels_per_hour));
        }
        if !(1..=60).contains(&self.rounding_minutes) {
            return Err(ConfigError::InvalidRounding(self.rounding_minutes));
        }
        if !(self.min_height.is_finite() && self.min_height > 0.0) {
            return Err(ConfigError::InvalidMinHeight(self.min_height));
        }
        if !(self.stack_unit.is_finite() && self.stack_unit >= 0.0) {
            return Err(ConfigError::InvalidStackUnit(self.stack_unit));
        }
        Ok(())
    }

    /// Number of minutes the column represents.
    pub fn span_minutes(&self) -> f64 {
        f64::from(self.end_hour.saturating_sub(self.start_hour)) * 60.0
    }

    /// Total column height.
    pub fn grid_height(&self) -> Pixels {
        Pixels(self.span_minutes() * self.pixels_per_hour / 60.0)
    }

    /// Pixel size of one rounding step.
    pub fn rounding_unit(&self) -> f64 {
        self.pixels_per_hour * f64::from(self.rounding_minutes) / 60.0
    }

    /// Labels for the hour gutter, one per row (`"6 AM"`, `"12 PM"`, ...).
    pub fn hour_labels(&self) -> Vec<String> {
        (self.start_hour..self.end_hour).map(hour_label).collect()
    }

    fn snap(&self, px: f64) -> f64 {
        let unit = self.rounding_unit();
        if unit > 0.0 {
            (px / unit).round() * unit
        } else {
            px
        }
    }
}

fn hour_label(hour: u32) -> String {
    let meridiem = if hour % 24 < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {meridiem}")
}

/// Vertical placement of an event inside a day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub top: Pixels,
    pub height: Pixels,
}

/// Maps an event's start and end instants onto the day column of the start's
/// local calendar date.
///
/// Out-of-window portions are clamped to the column edges; an event entirely
/// outside collapses onto the nearest edge and still gets `min_height`. An end
/// on a later day clamps to the bottom edge, and an end before the start is
/// treated as zero-length.
pub fn position_in_grid(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    grid: &GridConfig,
    tz: &Tz,
) -> GridPosition {
    let local_start = start.with_timezone(tz).naive_local();
    let local_end = end.with_timezone(tz).naive_local();

    let origin = local_start
        .date()
        .and_time(NaiveTime::from_hms_opt(grid.start_hour, 0, 0).unwrap_or(NaiveTime::MIN));
    let span = grid.span_minutes();
    let minutes_from_origin = |t: chrono::NaiveDateTime| {
        let minutes = (t - origin).num_seconds() as f64 / 60.0;
        minutes.clamp(0.0, span)
    };

    let start_min = minutes_from_origin(local_start);
    let end_min = minutes_from_origin(local_end).max(start_min);

    let scale = grid.pixels_per_hour / 60.0;
    let height = grid.snap((end_min - start_min) * scale).max(grid.min_height);
    let bottom_limit = (grid.grid_height().value() - height).max(0.0);
    let top = grid.snap(start_min * scale).min(bottom_limit);

    GridPosition {
        top: Pixels(top),
        height: Pixels(height),
    }
}
