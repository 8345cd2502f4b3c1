//! Actions for the event detail page.

use crate::api::ApiError;
use crate::clipboard::CopyPath;
use crate::types::{Event, EventId};

/// Actions for the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// The page was opened for `id`
    Mount {
        /// Event id from the path
        id: EventId,
    },

    /// The event arrived
    EventLoaded {
        /// The event
        event: Event,
    },

    /// The fetch failed or the event does not exist
    EventMissing {
        /// What went wrong
        error: ApiError,
    },

    /// The share button was pressed
    Share,

    /// The link reached a clipboard
    LinkCopied {
        /// Share this acknowledgment belongs to
        generation: u64,
        /// Which clipboard took it
        path: CopyPath,
    },

    /// The acknowledgment window ended
    CopyExpired {
        /// Share this reversion belongs to
        generation: u64,
    },
}
