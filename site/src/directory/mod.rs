//! The event directory.
//!
//! On mount the directory fetches the event list and the platform stats
//! concurrently. Both failures degrade silently: no events renders the empty
//! state, no stats renders zeros. Search text and the upcoming/past selector
//! are applied on every read of [`DirectoryState::visible`], in backend order.

pub mod actions;
pub mod filter;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;

pub use actions::DirectoryAction;
pub use reducer::DirectoryReducer;
pub use types::{Bucket, DirectoryState};
