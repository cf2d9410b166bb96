//! Human-readable output for laid-out weeks.
//!
//! - [`format_range`]: compact time labels (`"9 - 10am"`, `"10am - 2pm"`)
//! - [`format_details`]: multi-line event details for tooltips and popups
//! - [`week_header`]: the `"Week of Feb 3, 2025"` title
//! - [`render_week`]: terminal rendering of a whole [`WeekLayout`]

use std::borrow::Cow;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::event::{CalendarEvent, PositionedEvent};
use crate::layout::{DayLayout, WeekLayout};
use crate::time::EventTime;

/// Options for [`render_week`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Append pixel placement to each timed event.
    pub show_placement: bool,
    /// Print days without any events.
    pub show_empty_days: bool,
    /// Truncate titles longer than this many characters.
    pub max_title_length: Option<usize>,
    /// The viewer's current date; its day header is marked.
    pub today: Option<NaiveDate>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_placement: true,
            show_empty_days: true,
            max_title_length: None,
            today: None,
        }
    }
}

fn clock_label(hour: u32, minute: u32) -> String {
    if minute == 0 {
        hour.to_string()
    } else {
        format!("{hour}:{minute:02}")
    }
}

/// Formats a compact time range label in `tz`.
///
/// Minutes are omitted on the hour. The meridiem is always shown on the end
/// and on the start only when it differs from the end's.
pub fn format_range(start: DateTime<Utc>, end: DateTime<Utc>, tz: &Tz) -> String {
    let start = start.with_timezone(tz);
    let end = end.with_timezone(tz);
    let (start_pm, start_hour) = start.hour12();
    let (end_pm, end_hour) = end.hour12();
    let meridiem = |pm: bool| if pm { "pm" } else { "am" };

    let from = clock_label(start_hour, start.minute());
    let to = clock_label(end_hour, end.minute());
    if start_pm == end_pm {
        format!("{from} - {to}{}", meridiem(end_pm))
    } else {
        format!("{from}{} - {to}{}", meridiem(start_pm), meridiem(end_pm))
    }
}

fn format_when(start: &EventTime, end: &EventTime, tz: &Tz) -> String {
    const DAY: &str = "%a, %b %-d";
    const DAY_TIME: &str = "%a, %b %-d, %-I:%M %p";
    const TIME: &str = "%-I:%M %p";

    match (start, end) {
        (EventTime::DateTime(s), EventTime::DateTime(e)) => {
            let s = s.with_timezone(tz);
            let e = e.with_timezone(tz);
            let end_format = if s.date_naive() == e.date_naive() {
                TIME
            } else {
                DAY_TIME
            };
            format!("{} - {}", s.format(DAY_TIME), e.format(end_format))
        }
        _ => {
            let first = start.local_date(tz);
            // All-day end dates are exclusive.
            let last = match end {
                EventTime::AllDay(d) => *d - Duration::days(1),
                EventTime::DateTime(_) => end.local_date(tz),
            };
            if last > first {
                format!("{} - {}", first.format(DAY), last.format(DAY))
            } else {
                first.format(DAY).to_string()
            }
        }
    }
}

/// Formats a multi-line detail block: title, long time label, then location
/// and description when present.
pub fn format_details(event: &CalendarEvent, tz: &Tz) -> String {
    let mut lines = vec![
        event.summary.clone(),
        format_when(&event.start, &event.end, tz),
    ];
    lines.extend(
        [&event.location, &event.description]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    );
    lines.join("\n")
}

/// Truncates a string with an ellipsis if it exceeds `max_len` characters.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    if max_len <= 3 {
        return Cow::Owned(s.chars().take(max_len).collect());
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    Cow::Owned(format!("{truncated}..."))
}

fn title<'a>(summary: &'a str, options: &RenderOptions) -> Cow<'a, str> {
    match options.max_title_length {
        Some(max) => ellipsis(summary, max),
        None => Cow::Borrowed(summary),
    }
}

fn render_timed(out: &mut String, positioned: &PositionedEvent, tz: &Tz, options: &RenderOptions) {
    let label = match positioned.event.time_range() {
        Some((start, end)) => format_range(start, end, tz),
        None => String::from("?"),
    };
    out.push_str(&format!(
        "  {label}  {}",
        title(&positioned.event.summary, options)
    ));
    if options.show_placement {
        out.push_str(&format!(
            "  [top {}, height {}, left {}]",
            positioned.top, positioned.height, positioned.left_offset
        ));
    }
    out.push('\n');
}

fn render_day(out: &mut String, day: &DayLayout, tz: &Tz, options: &RenderOptions) {
    let empty = day.all_day.is_empty() && day.timed.is_empty() && day.all_day_overflow == 0;
    if empty && !options.show_empty_days {
        return;
    }

    out.push_str(&day.date.format("%a %b %-d").to_string());
    if options.today == Some(day.date) {
        out.push_str("  (today)");
    }
    out.push('\n');
    if empty {
        out.push_str("  (no events)\n");
        return;
    }
    for all_day in &day.all_day {
        out.push_str(&format!("  all day  {}\n", title(&all_day.event.summary, options)));
    }
    if day.all_day_overflow > 0 {
        out.push_str(&format!("  +{} more\n", day.all_day_overflow));
    }
    for positioned in &day.timed {
        render_timed(out, positioned, tz, options);
    }
}

/// Header line naming the week by its first day, e.g. `"Week of Feb 3, 2025"`.
pub fn week_header(layout: &WeekLayout) -> String {
    format!("Week of {}", layout.week.start_date().format("%b %-d, %Y"))
}

/// Renders a laid-out week as plain text: a header line, then one block
/// per day.
pub fn render_week(layout: &WeekLayout, options: &RenderOptions) -> String {
    let tz = layout.week.timezone();
    let mut out = week_header(layout);
    out.push('\n');
    for day in &layout.days {
        render_day(&mut out, day, &tz, options);
    }
    out
}
