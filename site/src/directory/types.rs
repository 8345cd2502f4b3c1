//! State of the event directory.

use super::filter;
use crate::dates::EventCard;
use crate::types::{Event, Stats};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The upcoming/past selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// No date filter
    #[default]
    All,
    /// Starts now or later
    Upcoming,
    /// Started before now
    Past,
}

impl Bucket {
    /// Every bucket, in selector order
    pub const ALL: [Self; 3] = [Self::All, Self::Upcoming, Self::Past];

    /// Name used on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Past => "past",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown bucket name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter: {0} (expected all, upcoming or past)")]
pub struct UnknownBucket(pub String);

impl FromStr for Bucket {
    type Err = UnknownBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBucket(s.to_string()))
    }
}

/// State of the directory view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    /// Events in backend order; empty until loaded or after a failure
    pub events: Vec<Event>,
    /// Platform counters; zero until loaded or after a failure
    pub stats: Stats,
    /// Free-text search
    pub query: String,
    /// Upcoming/past selector
    pub bucket: Bucket,
    pub(crate) events_settled: bool,
    pub(crate) stats_settled: bool,
}

impl DirectoryState {
    /// Whether both mount requests have completed, successfully or not
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.events_settled && self.stats_settled
    }

    /// Events passing the search text and the selector, in backend order
    #[must_use]
    pub fn visible(&self, now: NaiveDateTime) -> Vec<&Event> {
        filter::apply(&self.events, &self.query, self.bucket, now)
    }

    /// Cards for [`DirectoryState::visible`]
    #[must_use]
    pub fn cards(&self, now: NaiveDateTime) -> Vec<EventCard> {
        self.visible(now)
            .into_iter()
            .map(|event| EventCard::new(event, now))
            .collect()
    }
}
