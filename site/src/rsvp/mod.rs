//! The RSVP workflow.
//!
//! Loads one event, then collects a registration either from scratch or by
//! picking a returning attendee found through incremental name search.
//!
//! ```text
//! Loading ──▶ NotFound
//!    │
//!    └──▶ Ready { mode: New | Returning }
//!              │
//!              └─ Submit ──▶ Submitting ──▶ Succeeded (terminal)
//!                                │
//!                                └──▶ Idle + message
//! ```
//!
//! # Search ordering
//!
//! Every keystroke takes a new sequence number. Lookups may answer in any
//! order; only the answer tagged with the latest number is applied. With a
//! debounce window configured the lookup waits in a keyed delay, so a newer
//! keystroke replaces it.

pub mod actions;
pub mod reducer;
pub mod types;
pub mod validation;

pub use actions::RsvpAction;
pub use reducer::RsvpReducer;
pub use types::{
    AttendeeSearch, Confirmation, Field, FieldErrors, Mode, NO_MATCHES, RsvpForm, RsvpPage,
    RsvpState, SUBMIT_FAILED, Submission,
};
pub use validation::validate;
