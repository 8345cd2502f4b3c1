//! [`EventsApi`] backed by an in-memory catalogue
//!
//! Follows the backend's rules: events come back ordered by start, search
//! matches names case-insensitively and returns at most ten attendees, and a
//! registration either updates the picked attendee, reuses the attendee with
//! the same email, or creates a new one.

use super::{ApiError, EventsApi};
use crate::types::{
    Attendee, AttendeeId, AttendeeStatus, Event, EventId, Id, RsvpReceipt, RsvpRequest, Stats,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

const SEARCH_LIMIT: usize = 10;

/// One backend operation, for simulating outages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /api/events`
    ListEvents,
    /// `GET /api/stats`
    Stats,
    /// `GET /api/events/{id}`
    Event,
    /// `GET /search_attendee`
    Search,
    /// `POST /api/rsvp`
    Rsvp,
}

#[derive(Debug, Default)]
struct Catalog {
    events: Vec<Event>,
    attendees: Vec<Attendee>,
    /// (attendance id, event, attendee)
    attendances: Vec<(u64, EventId, AttendeeId)>,
    next_attendee: u64,
    next_attendance: u64,
    failing: HashSet<Endpoint>,
    searches: Vec<String>,
    submissions: Vec<RsvpRequest>,
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct InMemoryEventsApi {
    catalog: Mutex<Catalog>,
}

impl InMemoryEventsApi {
    /// An empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo catalogue: three upcoming events and one returning attendee
    /// already registered for the networking night.
    ///
    /// Event dates are relative to `today`.
    #[must_use]
    pub fn sample(today: NaiveDate) -> Self {
        let at = |days: i64, hour: u32| {
            today
                .checked_add_signed(Duration::days(days))
                .and_then(|day| NaiveTime::from_hms_opt(hour, 0, 0).map(|t| day.and_time(t)))
        };

        let event = |id: u64, name: &str, start: Option<NaiveDateTime>, end, venue: &str, about: &str| {
            Event {
                id: Id::from(id),
                name: name.to_string(),
                datetime: start,
                end_datetime: end,
                venue: Some(venue.to_string()),
                description: Some(about.to_string()),
                poster: None,
            }
        };

        let api = Self::new()
            .with_event(event(
                1,
                "Global Tech Summit 2026",
                at(20, 9),
                at(20, 17),
                "Convention Center, NYC",
                "A full-day tech conference.",
            ))
            .with_event(event(
                2,
                "Design Systems Workshop",
                at(30, 10),
                at(30, 16),
                "Creative Studio, London",
                "Hands-on design systems course.",
            ))
            .with_event(event(
                3,
                "Startup Networking Night",
                at(10, 18),
                at(10, 21),
                "Innovation Hub, Berlin",
                "Meet founders and investors.",
            ))
            .with_attendee(Attendee {
                id: Id::from(1),
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                contact: Some("+1234567890".to_string()),
                status: AttendeeStatus::Working,
            });

        api.register(&Id::from(3), &Id::from(1));
        api
    }

    /// Add an event
    #[must_use]
    pub fn with_event(self, event: Event) -> Self {
        self.lock().events.push(event);
        self
    }

    /// Add an attendee record
    #[must_use]
    pub fn with_attendee(self, attendee: Attendee) -> Self {
        {
            let mut catalog = self.lock();
            if let Ok(n) = attendee.id.as_str().parse::<u64>() {
                catalog.next_attendee = catalog.next_attendee.max(n);
            }
            catalog.attendees.push(attendee);
        }
        self
    }

    /// Make `endpoint` fail with a transport error until restored
    pub fn fail(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    /// Undo [`InMemoryEventsApi::fail`]
    pub fn restore(&self, endpoint: Endpoint) {
        self.lock().failing.remove(&endpoint);
    }

    /// Every search query received, in order
    #[must_use]
    pub fn searches(&self) -> Vec<String> {
        self.lock().searches.clone()
    }

    /// Every RSVP received, accepted or not
    #[must_use]
    pub fn submissions(&self) -> Vec<RsvpRequest> {
        self.lock().submissions.clone()
    }

    /// Current attendee records
    #[must_use]
    pub fn attendees(&self) -> Vec<Attendee> {
        self.lock().attendees.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, event: &EventId, attendee: &AttendeeId) -> u64 {
        let mut catalog = self.lock();
        catalog.next_attendance += 1;
        let id = catalog.next_attendance;
        catalog.attendances.push((id, event.clone(), attendee.clone()));
        id
    }

    fn check(catalog: &Catalog, endpoint: Endpoint) -> Result<(), ApiError> {
        if catalog.failing.contains(&endpoint) {
            return Err(ApiError::Transport(format!("{endpoint:?} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl EventsApi for InMemoryEventsApi {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let catalog = self.lock();
        Self::check(&catalog, Endpoint::ListEvents)?;

        let mut events = catalog.events.clone();
        events.sort_by_key(|event| event.datetime);
        Ok(events)
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let catalog = self.lock();
        Self::check(&catalog, Endpoint::Stats)?;

        Ok(Stats {
            total_events: catalog.events.len() as u64,
            total_attendees: catalog.attendees.len() as u64,
            total_rsvps: catalog.attendances.len() as u64,
        })
    }

    async fn event(&self, id: &EventId) -> Result<Event, ApiError> {
        let catalog = self.lock();
        Self::check(&catalog, Endpoint::Event)?;

        catalog
            .events
            .iter()
            .find(|event| &event.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn search_attendees(&self, query: &str) -> Result<Vec<Attendee>, ApiError> {
        let mut catalog = self.lock();
        catalog.searches.push(query.to_string());
        Self::check(&catalog, Endpoint::Search)?;

        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        Ok(catalog
            .attendees
            .iter()
            .filter(|attendee| attendee.name.to_lowercase().contains(&needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect())
    }

    async fn submit_rsvp(&self, request: &RsvpRequest) -> Result<RsvpReceipt, ApiError> {
        let mut catalog = self.lock();
        catalog.submissions.push(request.clone());
        Self::check(&catalog, Endpoint::Rsvp)?;

        if !catalog.events.iter().any(|event| event.id == request.event_id) {
            return Err(ApiError::Rejected {
                status: 404,
                message: None,
            });
        }

        let draft = &request.draft;
        let contact = (!draft.contact.is_empty()).then(|| draft.contact.clone());

        let picked = draft
            .attendee_id
            .as_ref()
            .and_then(|id| catalog.attendees.iter().position(|a| &a.id == id));
        let by_email = || {
            (!draft.email.is_empty())
                .then(|| catalog.attendees.iter().position(|a| a.email == draft.email))
                .flatten()
        };

        let attendee_id = match picked.or_else(by_email) {
            Some(index) => {
                let attendee = &mut catalog.attendees[index];
                attendee.name.clone_from(&draft.name);
                attendee.email.clone_from(&draft.email);
                attendee.contact = contact;
                attendee.status = draft.status;
                attendee.id.clone()
            },
            None if !draft.email.is_empty() => {
                catalog.next_attendee += 1;
                let id = Id::from(catalog.next_attendee);
                catalog.attendees.push(Attendee {
                    id: id.clone(),
                    name: draft.name.clone(),
                    email: draft.email.clone(),
                    contact,
                    status: draft.status,
                });
                id
            },
            None => {
                return Err(ApiError::Rejected {
                    status: 400,
                    message: Some("email or attendee_id required".to_string()),
                });
            },
        };

        let duplicate = catalog
            .attendances
            .iter()
            .any(|(_, event, attendee)| event == &request.event_id && attendee == &attendee_id);
        if duplicate {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some("You have already registered for this event!".to_string()),
            });
        }

        catalog.next_attendance += 1;
        let attendance_id = catalog.next_attendance;
        catalog
            .attendances
            .push((attendance_id, request.event_id.clone(), attendee_id));

        Ok(RsvpReceipt {
            attendance_id: Some(attendance_id),
        })
    }
}
