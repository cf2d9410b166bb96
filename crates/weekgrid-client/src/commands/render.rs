//! Week rendering: pick the week, fetch its events, lay them out and format
//! the result.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, info};
use weekgrid_core::{RenderOptions, Week, WeekLayout, render_week};
use weekgrid_providers::{
    Aggregated, CalendarProvider, CalendarSource, RawEvent, SourceFailure, StaticProvider,
    fetch_sources,
};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// What to render, independent of how it was requested.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub date: Option<NaiveDate>,
    pub week_offset: i64,
    pub events_file: Option<PathBuf>,
    pub json: bool,
    pub compact: bool,
    pub max_title_length: Option<usize>,
}

impl From<&Cli> for RenderArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            date: cli.date,
            week_offset: cli.week_offset,
            events_file: cli.events_file.clone(),
            json: cli.json,
            compact: cli.compact,
            max_title_length: cli.max_title_length,
        }
    }
}

impl RenderArgs {
    /// Selects the week to show: the one containing `date` (or `now`),
    /// shifted by `week_offset`.
    pub fn week(&self, now: DateTime<Utc>, tz: Tz) -> ClientResult<Week> {
        let base = match self.date {
            Some(date) => Week::containing(date, tz),
            None => Week::containing_instant(now, tz),
        };
        base.checked_offset(self.week_offset).ok_or_else(|| {
            ClientError::InvalidArgument(format!(
                "--week-offset {} is out of range",
                self.week_offset
            ))
        })
    }

    fn render_options(&self, today: NaiveDate) -> RenderOptions {
        RenderOptions {
            show_placement: !self.compact,
            show_empty_days: !self.compact,
            max_title_length: self.max_title_length,
            today: Some(today),
        }
    }
}

/// An events file: either a bare array of items or an `events.list` page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventsFile {
    Items(Vec<RawEvent>),
    Page { items: Vec<RawEvent> },
}

/// Reads raw events from a JSON file into an in-memory provider.
pub fn load_events_file(path: &Path) -> ClientResult<StaticProvider> {
    let file_error = |message: String| ClientError::EventsFile {
        path: path.display().to_string(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    let events = match serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))? {
        EventsFile::Items(items) | EventsFile::Page { items } => items,
    };
    debug!(path = %path.display(), events = events.len(), "loaded events file");
    Ok(StaticProvider::from_events(events))
}

#[cfg(feature = "google")]
fn google_provider(config: &ClientConfig) -> ClientResult<Box<dyn CalendarProvider>> {
    use weekgrid_providers::google::GoogleProvider;

    let settings = config.google.as_ref().ok_or_else(|| {
        ClientError::Config(format!(
            "no [google] section in {}; add credentials or pass --events-file",
            ClientConfig::default_path().display()
        ))
    })?;
    Ok(Box::new(GoogleProvider::new(settings.to_provider_config()?)?))
}

#[cfg(not(feature = "google"))]
fn google_provider(_config: &ClientConfig) -> ClientResult<Box<dyn CalendarProvider>> {
    Err(ClientError::Config(
        "built without Google support; pass --events-file".to_string(),
    ))
}

/// Fetches the week's events from the events file or Google Calendar.
///
/// Per-calendar failures are logged and leave that calendar empty; only a
/// provider that cannot be built at all is an error.
pub async fn fetch_week(
    args: &RenderArgs,
    config: &ClientConfig,
    week: &Week,
) -> ClientResult<Aggregated> {
    let window = week.time_window();
    let aggregated = match args.events_file {
        Some(ref path) => {
            let provider = load_events_file(path)?;
            let sources: Vec<_> = provider.calendar_ids().map(CalendarSource::new).collect();
            fetch_sources(&provider, &sources, &window).await
        }
        None => {
            let provider = google_provider(config)?;
            fetch_sources(provider.as_ref(), &config.calendars, &window).await
        }
    };
    if !aggregated.is_complete() {
        info!(
            failed = aggregated.failures.len(),
            "some calendars could not be fetched"
        );
    }
    Ok(aggregated)
}

/// Runs the default command and returns what to print.
pub async fn render(
    args: &RenderArgs,
    config: &ClientConfig,
    now: DateTime<Utc>,
) -> ClientResult<String> {
    config.layout.validate()?;
    let tz = config.layout.timezone()?;
    let week = args.week(now, tz)?;

    let aggregated = fetch_week(args, config, &week).await?;
    let layout = WeekLayout::compute(
        &aggregated.events,
        week,
        &config.layout,
        &config.color_resolver(),
    );

    debug!(
        week = %week.start_date(),
        fetched = aggregated.events.len(),
        placed = layout.event_count(),
        "laid out week"
    );

    if args.json {
        Ok(serde_json::to_string_pretty(&layout)?)
    } else {
        let today = now.with_timezone(&tz).date_naive();
        let mut out = render_week(&layout, &args.render_options(today));
        render_failures(&mut out, &aggregated.failures);
        Ok(out)
    }
}

/// Appends one line per calendar that could not be fetched, with a hint
/// when the credentials are at fault.
fn render_failures(out: &mut String, failures: &[SourceFailure]) {
    for failure in failures {
        out.push_str(&format!(
            "! {} not shown: {}\n",
            failure.name,
            failure.error.message()
        ));
        if failure.error.code().is_credential_problem() {
            out.push_str("  check the [google] credentials and the calendar's sharing\n");
        }
    }
}
