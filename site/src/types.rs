//! Domain types shared by the views and the API client.
//!
//! Events, stats and attendees are owned by the backend and only ever read
//! here. The [`RsvpDraft`] is the one piece of data the site creates itself.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque backend identifier.
///
/// The backend sends integers; the client also accepts strings. An id is
/// sent back in the form it arrived in, so `"007"` stays a string and `7`
/// stays a number. Equality only looks at the text, so the id parsed from
/// `/event/7` matches the event the backend sent as `7`.
#[derive(Debug, Clone)]
pub struct Id {
    text: String,
    number: Option<serde_json::Number>,
}

impl Id {
    /// Create an id from its textual form; it is sent as a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            text: id.into(),
            number: None,
        }
    }

    /// The textual form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Id {}

impl std::hash::Hash for Id {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Self {
            text: id.to_string(),
            number: Some(id.into()),
        }
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.number {
            Some(number) => number.serialize(serializer),
            None => serializer.serialize_str(&self.text),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(number) => Self {
                text: number.to_string(),
                number: Some(number),
            },
            Raw::Text(text) => Self::new(text),
        })
    }
}

/// Identifier of an [`Event`].
pub type EventId = Id;

/// Identifier of an [`Attendee`].
pub type AttendeeId = Id;

/// An event as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The only field used to address the event
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Start, in the site's local wall-clock time
    #[serde(default, with = "timestamp")]
    pub datetime: Option<NaiveDateTime>,
    /// End, rendered as-is and never checked against the start
    #[serde(default, with = "timestamp")]
    pub end_datetime: Option<NaiveDateTime>,
    /// Venue
    #[serde(default)]
    pub venue: Option<String>,
    /// Long-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Poster image URL; absent posters render a placeholder
    #[serde(default)]
    pub poster: Option<String>,
}

/// Platform-wide counters, displayed as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of events
    #[serde(default)]
    pub total_events: u64,
    /// Number of attendee records
    #[serde(default)]
    pub total_attendees: u64,
    /// Number of registrations
    #[serde(default)]
    pub total_rsvps: u64,
}

/// What an attendee does, as chosen on the RSVP form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AttendeeStatus {
    /// Student
    #[default]
    Student,
    /// Working professional
    Working,
    /// Anything else
    Other,
}

impl AttendeeStatus {
    /// Every status, in picker order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Working, Self::Other];

    /// The value sent to and received from the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Working => "Working",
            Self::Other => "Other",
        }
    }

    /// The label shown in the status picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Working => "Working Professional",
            Self::Other => "Other",
        }
    }

    /// Decode a backend value. Missing values are students; anything
    /// unrecognised is `Other`.
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None => Self::Student,
            Some(value) => value.parse().unwrap_or(Self::Other),
        }
    }
}

impl fmt::Display for AttendeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a status name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendee status: {0} (expected student, working or other)")]
pub struct UnknownStatus(pub String);

impl FromStr for AttendeeStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "working" | "working professional" => Ok(Self::Working),
            "other" => Ok(Self::Other),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

impl Serialize for AttendeeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttendeeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(value.as_deref()))
    }
}

/// A returning attendee as found by name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Record id, bound to the RSVP when the attendee is picked
    pub id: AttendeeId,
    /// Full name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Email address
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub contact: Option<String>,
    /// Student, working or other
    #[serde(default)]
    pub status: AttendeeStatus,
}

/// The RSVP form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RsvpDraft {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number, may be empty
    pub contact: String,
    /// Student, working or other
    pub status: AttendeeStatus,
    /// Set once a returning attendee is picked
    pub attendee_id: Option<AttendeeId>,
}

impl RsvpDraft {
    /// A draft pre-filled from a returning attendee.
    #[must_use]
    pub fn from_attendee(attendee: &Attendee) -> Self {
        Self {
            name: attendee.name.clone(),
            email: attendee.email.clone(),
            contact: attendee.contact.clone().unwrap_or_default(),
            status: attendee.status,
            attendee_id: Some(attendee.id.clone()),
        }
    }
}

/// Body of `POST /api/rsvp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpRequest {
    /// The form contents
    #[serde(flatten)]
    pub draft: RsvpDraft,
    /// Event being registered for
    pub event_id: EventId,
}

/// A registration accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RsvpReceipt {
    /// Id of the created attendance, when the backend returns one
    pub attendance_id: Option<u64>,
}

/// Raw body returned by `POST /api/rsvp`, for success and failure alike.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RsvpResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub attendance_id: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body returned by `GET /search_attendee`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub results: Vec<Attendee>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde support for the backend's wall-clock timestamps.
///
/// Accepts `2024-06-15T18:00:00`, fractional seconds, and strings with an
/// explicit offset (the wall-clock part is kept). Anything else decodes as
/// absent so one bad row never hides the rest of the list.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Parse one timestamp.
    #[must_use]
    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        NaiveDateTime::parse_from_str(value, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|at| at.naive_local()))
    }

    /// Deserialize an optional timestamp.
    ///
    /// # Errors
    ///
    /// Fails only if the value is neither a string nor null.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };

        let parsed = parse(&raw);
        if parsed.is_none() {
            tracing::warn!(value = %raw, "Ignoring unparseable timestamp");
        }
        Ok(parsed)
    }

    /// Serialize an optional timestamp in the backend's format.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)] // serde `with` signature
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }
}
