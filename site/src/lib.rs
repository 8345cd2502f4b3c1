//! # Attendeez Site
//!
//! The three views of the Attendeez events site, written as reducers for the
//! Attendeez [`Store`](attendeez_runtime::Store):
//!
//! - [`directory`]: the event list with live search, the upcoming/past
//!   selector and the platform stats
//! - [`detail`]: one event, its derived date facts and the share action
//! - [`rsvp`]: new vs returning attendee, incremental attendee search,
//!   validation and submission
//!
//! Every view talks to the backend through [`api::EventsApi`], and reads the
//! time through the [`Clock`](attendeez_core::environment::Clock) in its
//! [`SiteEnvironment`].
//!
//! ```text
//! Route::Directory ──▶ Route::Event(id) ──▶ Route::Rsvp(id) ──▶ confirmation
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use attendeez_runtime::Store;
//! use attendeez_site::directory::{DirectoryAction, DirectoryReducer, DirectoryState};
//!
//! let store = Store::new(DirectoryState::default(), DirectoryReducer::new(), env);
//! store.send(DirectoryAction::Mount).await?.wait().await;
//! ```

pub mod api;
pub mod clipboard;
pub mod config;
pub mod dates;
pub mod detail;
pub mod directory;
pub mod environment;
pub mod render;
pub mod router;
pub mod rsvp;
pub mod types;

pub use config::{Config, ConfigError};
pub use environment::SiteEnvironment;
pub use router::{Route, RouteError};
