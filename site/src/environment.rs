//! Dependencies shared by the three view reducers.

use crate::api::EventsApi;
use crate::clipboard::{Clipboard, ManualCopy, TerminalClipboard};
use crate::config::Config;
use crate::dates;
use attendeez_core::environment::{Clock, SystemClock};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Everything a view reducer reaches outside its own state through.
///
/// Production wires the HTTP client, the system clock and the terminal
/// clipboard; tests swap in the in-memory backend, a `FixedClock` and a
/// recording clipboard.
#[derive(Clone)]
pub struct SiteEnvironment {
    api: Arc<dyn EventsApi>,
    clock: Arc<dyn Clock>,
    clipboard: Arc<dyn Clipboard>,
    clipboard_fallback: Arc<dyn Clipboard>,
    utc_offset: FixedOffset,
    public_url: String,
    search_debounce: Duration,
}

impl SiteEnvironment {
    /// Create an environment around `api` with UTC time, no debounce and a
    /// `http://localhost` public URL.
    #[must_use]
    pub fn new(api: Arc<dyn EventsApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            clipboard: Arc::new(TerminalClipboard),
            clipboard_fallback: Arc::new(ManualCopy),
            utc_offset: Utc.fix(),
            public_url: "http://localhost".to_string(),
            search_debounce: Duration::ZERO,
        }
    }

    /// Production environment for `config`
    #[must_use]
    pub fn from_config(config: &Config, api: Arc<dyn EventsApi>) -> Self {
        Self::new(api, Arc::new(SystemClock))
            .with_utc_offset(config.site.utc_offset)
            .with_public_url(config.site.public_url.clone())
            .with_search_debounce(config.site.search_debounce)
    }

    /// Replace both clipboards
    #[must_use]
    pub fn with_clipboards(
        mut self,
        primary: Arc<dyn Clipboard>,
        fallback: Arc<dyn Clipboard>,
    ) -> Self {
        self.clipboard = primary;
        self.clipboard_fallback = fallback;
        self
    }

    /// Set the offset of the backend's wall-clock timestamps
    #[must_use]
    pub const fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Set the base of shared links
    #[must_use]
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = url.into();
        self
    }

    /// Set the attendee search debounce window
    #[must_use]
    pub const fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    /// Backend client
    #[must_use]
    pub fn api(&self) -> Arc<dyn EventsApi> {
        Arc::clone(&self.api)
    }

    /// Clock for getting current time
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Primary clipboard
    #[must_use]
    pub fn clipboard(&self) -> Arc<dyn Clipboard> {
        Arc::clone(&self.clipboard)
    }

    /// Clipboard used when the primary one fails
    #[must_use]
    pub fn clipboard_fallback(&self) -> Arc<dyn Clipboard> {
        Arc::clone(&self.clipboard_fallback)
    }

    /// Base of shared links
    #[must_use]
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Attendee search debounce window; zero means no debounce
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    /// The current local wall-clock time
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        dates::local_now(self.clock(), self.utc_offset)
    }
}

impl std::fmt::Debug for SiteEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteEnvironment")
            .field("utc_offset", &self.utc_offset)
            .field("public_url", &self.public_url)
            .field("search_debounce", &self.search_debounce)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)] // Test code

    use super::SiteEnvironment;
    use crate::api::InMemoryEventsApi;
    use crate::types::{Event, Id};
    use attendeez_testing::test_clock;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Arc;

    /// Environment at 2024-06-15 10:00 UTC around `api`
    pub fn env_with(api: Arc<InMemoryEventsApi>) -> SiteEnvironment {
        SiteEnvironment::new(api, Arc::new(test_clock())).with_public_url("https://events.test")
    }

    pub fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    pub fn event(id: u64, name: &str, datetime: Option<NaiveDateTime>) -> Event {
        Event {
            id: Id::from(id),
            name: name.to_string(),
            datetime,
            end_datetime: None,
            venue: None,
            description: None,
            poster: None,
        }
    }
}
