//! CalendarProvider trait definition.
//!
//! A provider fetches the raw events of one calendar for a time window. It
//! knows nothing about layout; [`crate::aggregate`] fans out over the
//! configured sources and turns failures into empty results.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use weekgrid_core::{CalendarRegistry, Rgb, TimeWindow};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::RawEvent;

/// A calendar to show on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    /// Provider calendar id, e.g. `"primary"` or `"team@example.com"`.
    pub id: String,
    /// Base color for the calendar color strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CalendarSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name if set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Builds the calendar color registry for a set of sources. Sources
    /// without a color are left out and fall back to the default color.
    pub fn registry(sources: &[CalendarSource]) -> CalendarRegistry {
        sources
            .iter()
            .filter_map(|source| source.color.map(|color| (source.id.clone(), color)))
            .collect()
    }
}

/// A boxed future for async trait methods, keeping the trait object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A calendar backend.
///
/// ```ignore
/// impl CalendarProvider for MyProvider {
///     fn name(&self) -> &str { "mine" }
///
///     fn fetch_events<'a>(
///         &'a self,
///         calendar_id: &'a str,
///         window: &'a TimeWindow,
///     ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
///         Box::pin(async move { Ok(Vec::new()) })
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// Short provider name used in logs and errors, e.g. `"google"`.
    fn name(&self) -> &str;

    /// Fetches the events of `calendar_id` that intersect `window`.
    ///
    /// Implementations handle pagination themselves. Recurring events come
    /// back expanded into instances.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network, authentication or decoding
    /// failures.
    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>>;
}

/// A provider that always fails, standing in for one that could not be
/// built.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    error: ProviderError,
}

impl ErrorProvider {
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl CalendarProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
        _window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        let error = self
            .error
            .detached()
            .with_provider(&self.name)
            .with_calendar(calendar_id);
        Box::pin(async move { Err(error) })
    }
}

/// Serves events from memory, keyed by calendar id.
///
/// Used for offline event files and tests. Every stored event of a calendar
/// is returned regardless of the window, like a provider that over-fetches.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    calendars: BTreeMap<String, Vec<RawEvent>>,
}

impl StaticProvider {
    /// Calendar id used for events that do not name one.
    pub const DEFAULT_CALENDAR: &'static str = "local";

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar_id: impl Into<String>, events: Vec<RawEvent>) -> Self {
        self.calendars
            .entry(calendar_id.into())
            .or_default()
            .extend(events);
        self
    }

    /// Groups events by their own `calendar_id`, using
    /// [`StaticProvider::DEFAULT_CALENDAR`] when it is missing.
    pub fn from_events(events: Vec<RawEvent>) -> Self {
        let mut calendars: BTreeMap<String, Vec<RawEvent>> = BTreeMap::new();
        for event in events {
            let id = event
                .calendar_id
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_CALENDAR.to_string());
            calendars.entry(id).or_default().push(event);
        }
        Self { calendars }
    }

    /// Calendar ids with stored events, sorted.
    pub fn calendar_ids(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }
}

impl CalendarProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
        _window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        let events = self.calendars.get(calendar_id).cloned();
        Box::pin(async move {
            events.ok_or_else(|| {
                ProviderError::not_found("no events stored for calendar")
                    .with_provider("static")
                    .with_calendar(calendar_id)
            })
        })
    }
}
