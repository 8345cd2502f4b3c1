//! The event detail page.
//!
//! Fetches one event by id and ends in one of three states: loading, loaded
//! or not found. A failed fetch is shown as not found; the only way out is
//! back to the directory.
//!
//! # Share
//!
//! Sharing copies `<public url>/event/{id}`. The "copied" acknowledgment
//! lasts two seconds and is reverted by a single keyed delay, so repeated
//! shares restart the window instead of stacking timers:
//!
//! ```text
//! Share ──▶ copy (clipboard, else fallback) ──▶ LinkCopied ──▶ copied = true
//!                                                   │
//!                                                   └─ Delay 2s, keyed ──▶ CopyExpired ──▶ copied = false
//! ```

pub mod actions;
pub mod reducer;
pub mod types;

pub use actions::DetailAction;
pub use reducer::{COPY_ACK_WINDOW, DetailReducer};
pub use types::{DetailPage, DetailState, EventFacts};
