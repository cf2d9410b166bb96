//! Fetching several calendars at once.
//!
//! Each source is fetched concurrently and independently. A failing source
//! contributes no events; the others still come through.

use futures::future::join_all;
use tracing::{debug, warn};
use weekgrid_core::{CalendarEvent, TimeWindow};

use crate::error::ProviderError;
use crate::normalize::normalize_events;
use crate::provider::{CalendarProvider, CalendarSource};

/// A source that yielded no events because its fetch failed.
#[derive(Debug)]
pub struct SourceFailure {
    pub calendar_id: String,
    /// The source's display name, for messages.
    pub name: String,
    pub error: ProviderError,
}

/// Merged result of fetching all sources.
#[derive(Debug, Default)]
pub struct Aggregated {
    /// Normalized events, tagged with their source, in source order.
    pub events: Vec<CalendarEvent>,
    pub failures: Vec<SourceFailure>,
}

impl Aggregated {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches every source for `window` and merges the normalized events.
///
/// Never fails as a whole: errors are logged and reported per source in
/// [`Aggregated::failures`].
pub async fn fetch_sources(
    provider: &dyn CalendarProvider,
    sources: &[CalendarSource],
    window: &TimeWindow,
) -> Aggregated {
    let fetches = sources
        .iter()
        .map(|source| provider.fetch_events(&source.id, window));
    let results = join_all(fetches).await;

    let mut aggregated = Aggregated::default();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(raw_events) => {
                let events = normalize_events(&raw_events, &source.id);
                debug!(
                    calendar = %source.id,
                    fetched = raw_events.len(),
                    kept = events.len(),
                    "fetched calendar"
                );
                aggregated.events.extend(events);
            }
            Err(error) => {
                warn!(
                    calendar = %source.id,
                    name = source.display_name(),
                    provider = provider.name(),
                    %error,
                    "calendar fetch failed, showing no events for it"
                );
                aggregated.failures.push(SourceFailure {
                    calendar_id: source.id.clone(),
                    name: source.display_name().to_string(),
                    error,
                });
            }
        }
    }
    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{BoxFuture, ErrorProvider, StaticProvider};
    use crate::raw_event::{RawEvent, RawEventTime};
    use crate::{ProviderErrorCode, ProviderResult};
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn window() -> TimeWindow {
        TimeWindow::new(utc(2025, 2, 3, 0, 0, 0), utc(2025, 2, 10, 0, 0, 0))
    }

    fn raw(id: &str, hour: u32) -> RawEvent {
        RawEvent::timed(id, utc(2025, 2, 3, hour, 0, 0), utc(2025, 2, 3, hour + 1, 0, 0))
            .with_summary(id)
    }

    /// Fails for one calendar and delegates the rest.
    struct FlakyProvider {
        inner: StaticProvider,
        broken: &'static str,
    }

    impl CalendarProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch_events<'a>(
            &'a self,
            calendar_id: &'a str,
            window: &'a TimeWindow,
        ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
            if calendar_id == self.broken {
                return Box::pin(async {
                    Err(ProviderError::authorization("access denied to calendar"))
                });
            }
            self.inner.fetch_events(calendar_id, window)
        }
    }

    #[tokio::test]
    async fn merges_and_tags_sources() {
        let provider = StaticProvider::new()
            .with_calendar("work", vec![raw("a", 9), raw("b", 10)])
            .with_calendar("home", vec![raw("c", 18)]);
        let sources = [CalendarSource::new("work"), CalendarSource::new("home")];

        let aggregated = fetch_sources(&provider, &sources, &window()).await;
        assert!(aggregated.is_complete());
        let tagged: Vec<_> = aggregated
            .events
            .iter()
            .map(|e| (e.id.as_str(), e.calendar_id.as_deref()))
            .collect();
        assert_eq!(
            tagged,
            [("a", Some("work")), ("b", Some("work")), ("c", Some("home"))]
        );
    }

    #[tokio::test]
    async fn failing_source_degrades_to_empty() {
        let provider = FlakyProvider {
            inner: StaticProvider::new()
                .with_calendar("work", vec![raw("a", 9)])
                .with_calendar("shared", vec![raw("s", 11)]),
            broken: "shared",
        };
        let sources = [
            CalendarSource::new("work"),
            CalendarSource::new("shared").with_name("Team"),
        ];

        let aggregated = fetch_sources(&provider, &sources, &window()).await;
        assert_eq!(aggregated.events.len(), 1);
        assert_eq!(aggregated.events[0].id, "a");
        assert_eq!(aggregated.failures.len(), 1);
        assert_eq!(aggregated.failures[0].calendar_id, "shared");
        assert_eq!(aggregated.failures[0].name, "Team");
        assert_eq!(
            aggregated.failures[0].error.code(),
            ProviderErrorCode::AuthorizationFailed
        );
    }

    #[tokio::test]
    async fn all_sources_failing_yields_nothing() {
        let provider = ErrorProvider::new("google", ProviderError::network("offline"));
        let sources = [CalendarSource::new("a"), CalendarSource::new("b")];
        let aggregated = fetch_sources(&provider, &sources, &window()).await;
        assert!(aggregated.events.is_empty());
        assert_eq!(aggregated.failures.len(), 2);
        assert_eq!(aggregated.failures[1].name, "b");
    }

    #[tokio::test]
    async fn malformed_events_are_dropped_per_source() {
        let mut broken = raw("broken", 12);
        broken.end = RawEventTime::default();
        let provider = StaticProvider::new().with_calendar("work", vec![raw("a", 9), broken]);
        let aggregated =
            fetch_sources(&provider, &[CalendarSource::new("work")], &window()).await;
        assert_eq!(aggregated.events.len(), 1);
        assert!(aggregated.is_complete());
    }

    #[tokio::test]
    async fn no_sources() {
        let aggregated = fetch_sources(&StaticProvider::new(), &[], &window()).await;
        assert!(aggregated.events.is_empty());
        assert!(aggregated.is_complete());
    }
}
