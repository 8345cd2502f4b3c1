//! Actions for the RSVP workflow.

use super::types::{Field, Mode};
use crate::api::ApiError;
use crate::types::{Attendee, AttendeeStatus, Event, EventId, RsvpReceipt};

/// Actions for the RSVP view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpAction {
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

    /// New or returning attendee was chosen
    SwitchMode {
        /// Chosen mode
        mode: Mode,
    },

    /// The search box changed
    SearchChanged {
        /// Text as typed
        query: String,
    },

    /// The debounce window for lookup `seq` ended
    SearchDue {
        /// Lookup sequence number
        seq: u64,
        /// Trimmed query
        query: String,
    },

    /// Lookup `seq` answered
    SearchResults {
        /// Lookup sequence number
        seq: u64,
        /// Matching attendees
        results: Vec<Attendee>,
    },

    /// Lookup `seq` failed
    SearchFailed {
        /// Lookup sequence number
        seq: u64,
        /// What went wrong
        error: ApiError,
    },

    /// A search result was picked
    PickAttendee {
        /// The returning attendee
        attendee: Attendee,
    },

    /// A text field was edited
    EditField {
        /// Which field
        field: Field,
        /// New contents
        value: String,
    },

    /// The status picker was opened or closed
    ToggleStatusPicker,

    /// A status was chosen in the picker
    SelectStatus {
        /// Chosen status
        status: AttendeeStatus,
    },

    /// The form was submitted
    Submit,

    /// The backend accepted the RSVP
    SubmitSucceeded {
        /// What the backend returned
        receipt: RsvpReceipt,
    },

    /// The backend refused the RSVP or could not be reached
    SubmitFailed {
        /// What went wrong
        error: ApiError,
    },
}
