//! Error types for the layout engine.
//!
//! The engine itself never fails on event data: malformed events are
//! rejected at the boundary with an [`EventError`] and simply left out of the
//! layout. [`ConfigError`] covers invalid grid, color and timezone settings.

use thiserror::Error;

/// Which end of an event a time error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Reasons an event cannot be placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Neither a date nor a timestamp was present.
    #[error("event {id}: {bound} has neither a date nor a timestamp")]
    MissingTime { id: String, bound: Bound },

    /// Both a date and a timestamp were present.
    #[error("event {id}: {bound} has both a date and a timestamp")]
    AmbiguousTime { id: String, bound: Bound },

    /// Start and end disagree on being all-day or timed.
    #[error("event {id}: start and end mix all-day and timed values")]
    MismatchedBounds { id: String },
}

impl EventError {
    /// Returns the id of the offending event.
    pub fn event_id(&self) -> &str {
        match self {
            Self::MissingTime { id, .. }
            | Self::AmbiguousTime { id, .. }
            | Self::MismatchedBounds { id } => id,
        }
    }
}

/// Invalid layout or color configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid hours must satisfy start < end <= 24 (got {start}..{end})")]
    InvalidHours { start: u32, end: u32 },

    #[error("pixels per hour must be a positive number (got {0})")]
    InvalidScale(f64),

    #[error("rounding must be between 1 and 60 minutes (got {0})")]
    InvalidRounding(u32),

    #[error("minimum height must be a positive number of pixels (got {0})")]
    InvalidMinHeight(f64),

    #[error("stack unit must be a non-negative number of pixels (got {0})")]
    InvalidStackUnit(f64),

    #[error("invalid hex color {0:?}")]
    InvalidColor(String),

    #[error("color palette must not be empty")]
    EmptyPalette,

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_error_messages() {
        let err = EventError::MissingTime {
            id: "evt-1".to_string(),
            bound: Bound::Start,
        };
        assert_eq!(
            err.to_string(),
            "event evt-1: start has neither a date nor a timestamp"
        );
        assert_eq!(err.event_id(), "evt-1");

        let err = EventError::MismatchedBounds {
            id: "evt-2".to_string(),
        };
        assert!(err.to_string().contains("mix all-day and timed"));
        assert_eq!(err.event_id(), "evt-2");
    }

    #[test]
    fn config_error_messages() {
        let err = ConfigError::InvalidHours { start: 23, end: 6 };
        assert!(err.to_string().contains("23..6"));

        let err = ConfigError::InvalidColor("#zzz".to_string());
        assert_eq!(err.to_string(), "invalid hex color \"#zzz\"");
    }
}
