//! Client side of the backend's HTTP contract.
//!
//! | Operation        | Request                      |
//! |------------------|------------------------------|
//! | list events      | `GET /api/events`            |
//! | stats            | `GET /api/stats`             |
//! | one event        | `GET /api/events/{id}`       |
//! | attendee search  | `GET /search_attendee?q=`    |
//! | submit RSVP      | `POST /api/rsvp`             |
//!
//! Views depend on the [`EventsApi`] trait. [`HttpEventsApi`] talks to the
//! real backend; [`InMemoryEventsApi`] follows the same rules without a
//! network, for tests and `--demo` runs.

pub mod http;
pub mod memory;

use crate::types::{Attendee, Event, EventId, RsvpReceipt, RsvpRequest, Stats};
use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpEventsApi;
pub use memory::{Endpoint, InMemoryEventsApi};

/// Errors that can occur when talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The addressed resource does not exist
    #[error("Not found")]
    NotFound,

    /// No response within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Connection or protocol failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend refused the request
    #[error("Rejected (status {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// The `error` field of the response body, if any
        message: Option<String>,
    },

    /// The response body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message the backend attached to a rejection.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}

/// The backend operations the views need.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// All events, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or cannot be decoded.
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    /// Platform-wide counters.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or cannot be decoded.
    async fn stats(&self) -> Result<Stats, ApiError>;

    /// One event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, or another
    /// [`ApiError`] if the request fails.
    async fn event(&self, id: &EventId) -> Result<Event, ApiError>;

    /// Attendees whose name contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or cannot be decoded.
    async fn search_attendees(&self, query: &str) -> Result<Vec<Attendee>, ApiError>;

    /// Register for an event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the
    /// registration, or another [`ApiError`] if the request fails.
    async fn submit_rsvp(&self, request: &RsvpRequest) -> Result<RsvpReceipt, ApiError>;
}
