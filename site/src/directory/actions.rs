//! Actions for the event directory.

use super::types::Bucket;
use crate::api::ApiError;
use crate::types::{Event, Stats};

/// Actions for the directory view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryAction {
    /// The view was opened; fetch events and stats
    Mount,

    /// Event list arrived
    EventsLoaded {
        /// Events in backend order
        events: Vec<Event>,
    },

    /// Event list request failed
    EventsFailed {
        /// What went wrong
        error: ApiError,
    },

    /// Stats arrived
    StatsLoaded {
        /// Platform counters
        stats: Stats,
    },

    /// Stats request failed
    StatsFailed {
        /// What went wrong
        error: ApiError,
    },

    /// The search text changed
    QueryChanged {
        /// New search text
        query: String,
    },

    /// A bucket was selected
    BucketSelected {
        /// Selected bucket
        bucket: Bucket,
    },
}
