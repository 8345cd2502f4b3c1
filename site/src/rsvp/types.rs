//! State of the RSVP workflow.

use crate::types::{Attendee, Event, EventId, RsvpDraft};
use std::collections::BTreeMap;
use std::fmt;

/// Shown when a submission fails without a server message
pub const SUBMIT_FAILED: &str = "Failed to submit RSVP. Please try again.";

/// Shown when a search finds nobody
pub const NO_MATCHES: &str = "No matching profiles found. Fill in the form below to create one.";

/// Shortest trimmed query that is sent to the backend
pub const MIN_SEARCH_LEN: usize = 2;

/// New attendee, or a returning one found by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Fill in the form from scratch
    #[default]
    New,
    /// Search for an existing attendee record
    Returning,
}

/// Where the submission stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Submission {
    /// Not sent, or sent and refused
    #[default]
    Idle,
    /// Request in flight; further submits are ignored
    Submitting,
    /// Accepted; the form is frozen
    Succeeded {
        /// Attendance id returned by the backend
        attendance_id: Option<u64>,
    },
}

/// A text field of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Phone number
    Contact,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Contact => "contact",
        })
    }
}

/// Field to message map; any entry blocks submission
pub type FieldErrors = BTreeMap<Field, String>;

/// Returning-attendee search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendeeSearch {
    /// Text as typed
    pub query: String,
    /// Results of the latest lookup
    pub results: Vec<Attendee>,
    /// The latest lookup is outstanding
    pub searching: bool,
    /// Sequence number of the latest lookup; responses tagged with anything
    /// else are stale
    pub(crate) latest: u64,
}

impl AttendeeSearch {
    /// Whether to show [`NO_MATCHES`]
    #[must_use]
    pub fn no_matches(&self) -> bool {
        self.query.trim().chars().count() >= MIN_SEARCH_LEN
            && self.results.is_empty()
            && !self.searching
    }

    /// Start a new lookup generation, making every earlier one stale
    pub(crate) const fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }
}

/// The form, once the event is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpForm {
    /// Event being registered for
    pub event: Event,
    /// New or returning attendee
    pub mode: Mode,
    /// Form contents
    pub draft: RsvpDraft,
    /// Validation messages
    pub errors: FieldErrors,
    /// Message of the last refused submission
    pub submit_error: Option<String>,
    /// Returning-attendee search
    pub search: AttendeeSearch,
    /// The status picker is open
    pub status_picker_open: bool,
    /// Submission progress
    pub submission: Submission,
}

impl RsvpForm {
    /// A blank form for `event`
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self {
            event,
            mode: Mode::New,
            draft: RsvpDraft::default(),
            errors: FieldErrors::new(),
            submit_error: None,
            search: AttendeeSearch::default(),
            status_picker_open: false,
            submission: Submission::Idle,
        }
    }

    /// The form no longer accepts input
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self.submission, Submission::Succeeded { .. })
    }
}

/// What the page is showing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RsvpPage {
    /// Event fetch in flight
    #[default]
    Loading,
    /// Unknown id or failed fetch
    NotFound,
    /// The form
    Ready(Box<RsvpForm>),
}

/// State of the RSVP view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpState {
    /// Id from the path
    pub id: Option<EventId>,
    /// Loading, not found or ready
    pub page: RsvpPage,
}

/// What the confirmation screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<'a> {
    /// Event registered for
    pub event: &'a Event,
    /// Where the confirmation email goes
    pub email: &'a str,
    /// Attendance id, when returned
    pub attendance_id: Option<u64>,
}

impl RsvpState {
    /// The form, once ready
    #[must_use]
    pub fn form(&self) -> Option<&RsvpForm> {
        match &self.page {
            RsvpPage::Ready(form) => Some(form),
            RsvpPage::Loading | RsvpPage::NotFound => None,
        }
    }

    pub(crate) fn form_mut(&mut self) -> Option<&mut RsvpForm> {
        match &mut self.page {
            RsvpPage::Ready(form) => Some(form),
            RsvpPage::Loading | RsvpPage::NotFound => None,
        }
    }

    /// Whether the page ended up not found
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.page, RsvpPage::NotFound)
    }

    /// Whether a submission is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.form()
            .is_some_and(|form| form.submission == Submission::Submitting)
    }

    /// The confirmation, once the RSVP was accepted
    #[must_use]
    pub fn confirmation(&self) -> Option<Confirmation<'_>> {
        let form = self.form()?;
        match form.submission {
            Submission::Succeeded { attendance_id } => Some(Confirmation {
                event: &form.event,
                email: &form.draft.email,
                attendance_id,
            }),
            Submission::Idle | Submission::Submitting => None,
        }
    }
}
