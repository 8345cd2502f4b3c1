//! Date facts shared by every view.
//!
//! All comparisons happen in the site's local wall-clock time: the backend
//! sends naive timestamps, and "now" is the [`Clock`] instant shifted by the
//! configured UTC offset.

use crate::types::Event;
use attendeez_core::environment::Clock;
use chrono::{Duration, FixedOffset, NaiveDateTime};

/// Badge shown on an event card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBadge {
    /// Started strictly before now
    Past,
    /// Later today
    Today,
    /// Some time tomorrow
    Tomorrow,
}

impl DateBadge {
    /// Text shown on the card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Past => "Past Event",
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
        }
    }
}

/// The current local wall-clock time.
#[must_use]
pub fn local_now(clock: &dyn Clock, offset: FixedOffset) -> NaiveDateTime {
    clock.now().with_timezone(&offset).naive_local()
}

/// Whether an event has started. Events without a start are never past.
#[must_use]
pub fn is_past(event: &Event, now: NaiveDateTime) -> bool {
    event.datetime.is_some_and(|at| at < now)
}

/// Classify a timestamp by calendar day relative to `now`.
///
/// `Past` wins over `Today`, so an event earlier today is `Past`.
#[must_use]
pub fn date_badge(at: NaiveDateTime, now: NaiveDateTime) -> Option<DateBadge> {
    let today = now.date();

    if at < now {
        Some(DateBadge::Past)
    } else if at.date() == today {
        Some(DateBadge::Today)
    } else if Some(at.date()) == today.checked_add_signed(Duration::days(1)) {
        Some(DateBadge::Tomorrow)
    } else {
        None
    }
}

/// Badge for an event, if it has a start.
#[must_use]
pub fn event_badge(event: &Event, now: NaiveDateTime) -> Option<DateBadge> {
    event.datetime.and_then(|at| date_badge(at, now))
}

/// `Saturday, June 15, 2024`
#[must_use]
pub fn long_date(at: NaiveDateTime) -> String {
    at.format("%A, %B %-d, %Y").to_string()
}

/// `Sat, Jun 15, 2024`
#[must_use]
pub fn short_date(at: NaiveDateTime) -> String {
    at.format("%a, %b %-d, %Y").to_string()
}

/// `6:00 PM`
#[must_use]
pub fn clock_time(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

/// `6:00 PM - 8:00 PM`, or just the start when there is no end.
#[must_use]
pub fn time_range(start: NaiveDateTime, end: Option<NaiveDateTime>) -> String {
    match end {
        Some(end) => format!("{} - {}", clock_time(start), clock_time(end)),
        None => clock_time(start),
    }
}

/// Everything an event card displays, derived from one event and "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    /// Event name
    pub name: String,
    /// Date badge, if any
    pub badge: Option<DateBadge>,
    /// Past events are shown with reduced emphasis
    pub dimmed: bool,
    /// Past events hide the RSVP call-to-action
    pub show_rsvp: bool,
    /// Poster URL, `None` for the placeholder
    pub poster: Option<String>,
    /// `Sat, Jun 15, 2024`
    pub date_line: Option<String>,
    /// `6:00 PM - 8:00 PM`
    pub time_line: Option<String>,
    /// Venue
    pub venue: Option<String>,
    /// Description
    pub description: Option<String>,
}

impl EventCard {
    /// Derive the card for `event`.
    #[must_use]
    pub fn new(event: &Event, now: NaiveDateTime) -> Self {
        let past = is_past(event, now);

        Self {
            name: event.name.clone(),
            badge: event_badge(event, now),
            dimmed: past,
            show_rsvp: !past,
            poster: event.poster.clone().filter(|url| !url.is_empty()),
            date_line: event.datetime.map(short_date),
            time_line: event.datetime.map(|at| time_range(at, event.end_datetime)),
            venue: event.venue.clone(),
            description: event.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::types::Id;
    use attendeez_testing::{FixedClock, at};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        wall(2024, 6, 15, 10, 0)
    }

    fn event_at(datetime: Option<NaiveDateTime>) -> Event {
        Event {
            id: Id::from(1),
            name: "Meetup".into(),
            datetime,
            end_datetime: None,
            venue: None,
            description: None,
            poster: None,
        }
    }

    #[test]
    fn badge_classification() {
        assert_eq!(date_badge(wall(2024, 6, 15, 18, 0), now()), Some(DateBadge::Today));
        assert_eq!(date_badge(wall(2024, 6, 16, 9, 0), now()), Some(DateBadge::Tomorrow));
        assert_eq!(date_badge(wall(2024, 6, 10, 9, 0), now()), Some(DateBadge::Past));
        assert_eq!(date_badge(wall(2024, 6, 20, 9, 0), now()), None);
    }

    #[test]
    fn badge_uses_calendar_days_not_24h_windows() {
        let late = wall(2024, 6, 15, 23, 30);
        assert_eq!(date_badge(wall(2024, 6, 16, 0, 15), late), Some(DateBadge::Tomorrow));
        assert_eq!(date_badge(wall(2024, 6, 16, 23, 59), late), Some(DateBadge::Tomorrow));
        assert_eq!(date_badge(wall(2024, 6, 17, 0, 1), late), None);
        assert_eq!(date_badge(wall(2024, 6, 15, 9, 0), now()), Some(DateBadge::Past));
    }

    #[test]
    fn events_without_start_are_never_past_and_have_no_badge() {
        let event = event_at(None);
        assert!(!is_past(&event, now()));
        assert_eq!(event_badge(&event, now()), None);
    }

    #[test]
    fn local_now_applies_the_offset() {
        let clock = FixedClock::new(at("2024-06-15T23:30:00Z"));
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(local_now(&clock, offset), wall(2024, 6, 16, 1, 30));
    }

    #[test]
    fn formats() {
        let start = wall(2024, 6, 15, 18, 0);
        assert_eq!(long_date(start), "Saturday, June 15, 2024");
        assert_eq!(short_date(start), "Sat, Jun 15, 2024");
        assert_eq!(time_range(start, Some(wall(2024, 6, 15, 20, 0))), "6:00 PM - 8:00 PM");
        assert_eq!(time_range(wall(2024, 6, 15, 9, 5), None), "9:05 AM");
    }

    #[test]
    fn past_cards_are_dimmed_and_hide_rsvp() {
        let card = EventCard::new(&event_at(Some(wall(2024, 6, 10, 9, 0))), now());
        assert!(card.dimmed);
        assert!(!card.show_rsvp);
        assert_eq!(card.badge, Some(DateBadge::Past));

        let card = EventCard::new(&event_at(Some(wall(2024, 6, 16, 9, 0))), now());
        assert!(!card.dimmed);
        assert!(card.show_rsvp);
        assert_eq!(card.poster, None);
    }

    proptest! {
        #[test]
        fn past_badge_agrees_with_is_past(offset_minutes in -20_000i64..20_000) {
            let at = now() + Duration::minutes(offset_minutes);
            let event = event_at(Some(at));
            prop_assert_eq!(
                event_badge(&event, now()) == Some(DateBadge::Past),
                is_past(&event, now())
            );
        }

        #[test]
        fn today_and_tomorrow_are_never_past(offset_minutes in 0i64..20_000) {
            let at = now() + Duration::minutes(offset_minutes);
            let badge = date_badge(at, now());
            prop_assert_ne!(badge, Some(DateBadge::Past));
            if badge == Some(DateBadge::Today) {
                prop_assert_eq!(at.date(), now().date());
            }
        }
    }
}
