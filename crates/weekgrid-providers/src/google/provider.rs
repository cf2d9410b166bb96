//! Google Calendar provider implementation.
//!
//! This module implements the [`CalendarProvider`] trait for Google Calendar.

use tracing::debug;
use weekgrid_core::TimeWindow;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider};
use crate::raw_event::RawEvent;

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;

/// Google Calendar provider.
///
/// Fetches events through the Calendar API v3 with a pre-obtained API key
/// or access token.
#[derive(Debug)]
pub struct GoogleProvider {
    client: GoogleCalendarClient,
}

impl GoogleProvider {
    pub const NAME: &'static str = "google";

    /// Creates a new Google provider with the given configuration.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|msg| ProviderError::configuration(msg).with_provider(Self::NAME))?;
        debug!(
            credentials = config.credentials.kind(),
            base_url = %config.base_url,
            "creating google provider"
        );

        let client = GoogleCalendarClient::new(&config).map_err(|e| e.with_provider(Self::NAME))?;
        Ok(Self { client })
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_events<'a>(
        &'a self,
        calendar_id: &'a str,
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            self.client
                .list_events(calendar_id, window)
                .await
                .map_err(|e| e.with_provider(Self::NAME).with_calendar(calendar_id))
        })
    }
}
