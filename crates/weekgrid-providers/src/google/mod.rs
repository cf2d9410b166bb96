//! Google Calendar provider implementation.
//!
//! Reads events through the Calendar API v3 `events.list` endpoint with
//! server-side recurring event expansion. Requests are authorized with
//! either an API key (public calendars) or an OAuth access token obtained
//! out of band.
//!
//! # Example
//!
//! ```ignore
//! use weekgrid_providers::google::{GoogleConfig, GoogleCredentials, GoogleProvider};
//!
//! let config = GoogleConfig::new(GoogleCredentials::AccessToken(token));
//! let provider = GoogleProvider::new(config)?;
//! let events = provider.fetch_events("primary", &week.time_window()).await?;
//! ```

mod client;
mod config;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, GoogleCredentials};
pub use provider::GoogleProvider;
