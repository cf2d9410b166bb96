//! Calendar sources for weekgrid.
//!
//! - [`CalendarProvider`] - the trait calendar backends implement
//! - [`RawEvent`] - event data as a backend returns it
//! - [`normalize_event`] - validation into [`weekgrid_core::CalendarEvent`]
//! - [`fetch_sources`] - concurrent fetch over several calendars
//!
//! ```text
//!   Google API        events file
//!       │                  │
//!  GoogleProvider    StaticProvider
//!       └──── CalendarProvider ────┘
//!                   │ RawEvent
//!                   ▼ normalize_event()
//!             CalendarEvent
//! ```

pub mod aggregate;
pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod normalize;
pub mod provider;
pub mod raw_event;

pub use aggregate::{Aggregated, SourceFailure, fetch_sources};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{BoxFuture, CalendarProvider, CalendarSource, ErrorProvider, StaticProvider};
pub use raw_event::{RawEvent, RawEventTime};
