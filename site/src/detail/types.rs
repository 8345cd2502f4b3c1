//! State of the event detail page.

use crate::dates::{self, is_past};
use crate::router::Route;
use crate::types::{Event, EventId};
use chrono::NaiveDateTime;

/// What the page is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailPage {
    /// Fetch in flight
    #[default]
    Loading,
    /// The event
    Loaded(Event),
    /// Unknown id or failed fetch
    NotFound,
}

/// State of the detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    /// Id from the path
    pub id: Option<EventId>,
    /// Loading, loaded or not found
    pub page: DetailPage,
    /// The share acknowledgment is showing
    pub copied: bool,
    /// Bumped on every share; late acknowledgments and reversions from an
    /// earlier share carry an older value and are ignored
    pub(crate) share_generation: u64,
}

impl DetailState {
    /// The loaded event
    #[must_use]
    pub const fn event(&self) -> Option<&Event> {
        match &self.page {
            DetailPage::Loaded(event) => Some(event),
            DetailPage::Loading | DetailPage::NotFound => None,
        }
    }

    /// Whether the page ended up not found
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.page, DetailPage::NotFound)
    }

    /// Derived display facts for the loaded event
    #[must_use]
    pub fn facts(&self, now: NaiveDateTime) -> Option<EventFacts> {
        self.event().map(|event| EventFacts::new(event, now))
    }

    /// Where the not-found page leads
    #[must_use]
    pub const fn back(&self) -> Route {
        Route::Directory
    }
}

/// Display facts derived from an event and "now"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFacts {
    /// Started before now
    pub is_past: bool,
    /// `Saturday, June 15, 2024`
    pub date: Option<String>,
    /// `6:00 PM - 8:00 PM`
    pub time: Option<String>,
    /// RSVP call-to-action, hidden for past events
    pub rsvp: Option<Route>,
}

impl EventFacts {
    /// Derive the facts for `event`
    #[must_use]
    pub fn new(event: &Event, now: NaiveDateTime) -> Self {
        let past = is_past(event, now);

        Self {
            is_past: past,
            date: event.datetime.map(dates::long_date),
            time: event
                .datetime
                .map(|at| dates::time_range(at, event.end_datetime)),
            rsvp: (!past).then(|| Route::Rsvp(event.id.clone())),
        }
    }
}
