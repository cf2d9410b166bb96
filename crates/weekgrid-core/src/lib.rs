//! Core types for weekgrid: events, grid time math, day partitioning,
//! overlap stacking, colors and the week layout pass.

pub mod arrange;
pub mod classify;
pub mod color;
pub mod error;
pub mod event;
pub mod format;
pub mod grid;
pub mod layout;
pub mod partition;
pub mod time;
pub mod tracing;

pub use arrange::{arrange, events_overlap};
pub use classify::{DayLanes, is_all_day, is_timed, split_day};
pub use color::{
    CalendarRegistry, ColorConfig, ColorMemo, ColorResolver, ColorScheme, ColorStrategy,
    DEFAULT_CALENDAR_COLOR, Palette, Rgb, hash_identifier,
};
pub use error::{Bound, ConfigError, EventError};
pub use event::{AllDayEvent, CalendarEvent, PositionedEvent};
pub use format::{
    RenderOptions, ellipsis, format_details, format_range, render_week, week_header,
};
pub use grid::{GridConfig, GridPosition, Pixels, position_in_grid};
pub use layout::{DayLayout, LayoutConfig, WeekLayout};
pub use partition::{DayBuckets, group_by_day};
pub use time::{DAYS_IN_WEEK, EventTime, TimeWindow, Week, parse_timezone};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
