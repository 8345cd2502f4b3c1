//! Plain-text rendering of the three views for the terminal front end.
//!
//! Every function is pure: state and "now" in, text out.

use crate::dates::{self, EventCard};
use crate::detail::{DetailPage, DetailState};
use crate::directory::DirectoryState;
use crate::router::Route;
use crate::rsvp::{Mode, NO_MATCHES, RsvpForm, RsvpPage, RsvpState, Submission};
use crate::types::{AttendeeStatus, Event};
use chrono::NaiveDateTime;

const BACK: &str = "← Back to Events (/)";

/// "Showing 1 event", "Showing 3 events"
#[must_use]
pub fn showing(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("Showing {count} event{plural}")
}

fn card(card: &EventCard, route: &Route) -> Vec<String> {
    let mut lines = Vec::new();

    let badge = card
        .badge
        .map(|badge| format!(" [{}]", badge.label()))
        .unwrap_or_default();
    let dim = if card.dimmed { " (ended)" } else { "" };
    lines.push(format!("• {}{badge}{dim}", card.name));

    if let Some(date) = &card.date_line {
        lines.push(format!("    {date}"));
    }
    if let Some(time) = &card.time_line {
        lines.push(format!("    {time}"));
    }
    if let Some(venue) = &card.venue {
        lines.push(format!("    @ {venue}"));
    }
    if let Some(description) = &card.description {
        lines.push(format!("    {description}"));
    }

    lines.push(format!("    Details: {route}"));
    lines
}

/// The directory: stats, the result count and one card per visible event.
#[must_use]
pub fn directory(state: &DirectoryState, now: NaiveDateTime) -> String {
    let mut lines = vec![
        format!(
            "Events: {}  Attendees: {}  RSVPs: {}",
            state.stats.total_events, state.stats.total_attendees, state.stats.total_rsvps
        ),
        String::new(),
    ];

    if !state.is_loaded() {
        lines.push("Loading...".to_string());
        return lines.join("\n");
    }

    let visible = state.visible(now);
    lines.push(showing(visible.len()));

    if visible.is_empty() {
        lines.push(String::new());
        lines.push("No events found".to_string());
        lines.push(if state.query.is_empty() {
            "There are no events to display at the moment. Check back soon!".to_string()
        } else {
            format!(
                "We couldn't find any events matching \"{}\". Try adjusting your search.",
                state.query
            )
        });
        return lines.join("\n");
    }

    for event in visible {
        lines.push(String::new());
        lines.extend(card(&EventCard::new(event, now), &Route::Event(event.id.clone())));
    }

    lines.join("\n")
}

fn not_found(detail: &str) -> String {
    ["Event Not Found", detail, "", BACK].join("\n")
}

fn event_header(event: &Event, now: NaiveDateTime) -> Vec<String> {
    let mut lines = vec![event.name.clone()];

    if let Some(at) = event.datetime {
        lines.push(dates::long_date(at));
        lines.push(dates::time_range(at, event.end_datetime));
    }
    if let Some(venue) = &event.venue {
        lines.push(venue.clone());
    }
    if dates::is_past(event, now) {
        lines.push("This event has ended".to_string());
    }
    lines
}

/// The detail page, or its loading and not-found states.
#[must_use]
pub fn detail(state: &DetailState, now: NaiveDateTime) -> String {
    let event = match &state.page {
        DetailPage::Loading => return "Loading...".to_string(),
        DetailPage::NotFound => {
            return not_found("The event you're looking for doesn't exist or has been removed.");
        },
        DetailPage::Loaded(event) => event,
    };

    let mut lines = event_header(event, now);

    if let Some(description) = &event.description {
        lines.push(String::new());
        lines.push(description.clone());
    }

    lines.push(String::new());
    if let Some(rsvp) = state.facts(now).and_then(|facts| facts.rsvp) {
        lines.push(format!("RSVP: {rsvp}"));
    }
    lines.push(if state.copied { "Link Copied!" } else { "Share Event" }.to_string());
    lines.push(BACK.to_string());

    lines.join("\n")
}

/// The status picker, with the current choice marked.
#[must_use]
pub fn status_options(selected: AttendeeStatus) -> String {
    AttendeeStatus::ALL
        .iter()
        .map(|status| {
            let mark = if *status == selected { "(•)" } else { "( )" };
            format!("{mark} {}", status.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn form(form: &RsvpForm, now: NaiveDateTime) -> Vec<String> {
    let mut lines = event_header(&form.event, now);
    lines.push(String::new());

    lines.push(match form.mode {
        Mode::New => "[New attendee]  Returning attendee".to_string(),
        Mode::Returning => "New attendee  [Returning attendee]".to_string(),
    });

    if form.mode == Mode::Returning {
        lines.push(format!("Search: {}", form.search.query));
        if form.search.searching {
            lines.push("  Searching...".to_string());
        }
        for (index, attendee) in form.search.results.iter().enumerate() {
            lines.push(format!("  {}. {} <{}>", index + 1, attendee.name, attendee.email));
        }
        if form.search.no_matches() {
            lines.push(format!("  {NO_MATCHES}"));
        }
    }

    for (label, value, field) in [
        ("Name", &form.draft.name, crate::rsvp::Field::Name),
        ("Email", &form.draft.email, crate::rsvp::Field::Email),
        ("Contact", &form.draft.contact, crate::rsvp::Field::Contact),
    ] {
        lines.push(format!("{label}: {value}"));
        if let Some(message) = form.errors.get(&field) {
            lines.push(format!("  ! {message}"));
        }
    }
    lines.push(format!("Status: {}", form.draft.status));
    if form.status_picker_open {
        lines.push(status_options(form.draft.status));
    }

    if let Some(message) = &form.submit_error {
        lines.push(String::new());
        lines.push(format!("! {message}"));
    }

    lines.push(String::new());
    lines.push(
        if form.submission == Submission::Submitting {
            "Submitting..."
        } else {
            "Confirm RSVP"
        }
        .to_string(),
    );
    lines
}

/// The RSVP page: loading, not found, the form or the confirmation.
#[must_use]
pub fn rsvp(state: &RsvpState, now: NaiveDateTime) -> String {
    let ready = match &state.page {
        RsvpPage::Loading => return "Loading...".to_string(),
        RsvpPage::NotFound => return not_found("The event you're looking for doesn't exist."),
        RsvpPage::Ready(ready) => ready,
    };

    let Some(confirmation) = state.confirmation() else {
        return form(ready, now).join("\n");
    };

    let mut lines = vec![
        "You're All Set!".to_string(),
        format!(
            "Your RSVP for {} has been confirmed.",
            confirmation.event.name
        ),
        format!(
            "We'll send a confirmation email to {}",
            confirmation.email
        ),
    ];
    if let Some(id) = confirmation.attendance_id {
        lines.push(format!("Attendance #{id}"));
    }
    lines.push(String::new());
    lines.extend(event_header(confirmation.event, now));
    lines.push(String::new());
    lines.push("Browse More Events (/)".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::environment::test_support::{event, wall};
    use crate::rsvp::{Field, RsvpForm};
    use crate::types::{Attendee, Id, Stats};

    fn now() -> NaiveDateTime {
        wall(2024, 6, 15, 10, 0)
    }

    fn loaded_directory() -> DirectoryState {
        let mut tonight = event(1, "Evening Social", Some(wall(2024, 6, 15, 18, 0)));
        tonight.end_datetime = Some(wall(2024, 6, 15, 20, 0));
        tonight.venue = Some("Innovation Hub".into());

        DirectoryState {
            events: vec![tonight, event(2, "Old Meetup", Some(wall(2024, 6, 10, 18, 0)))],
            stats: Stats {
                total_events: 2,
                total_attendees: 5,
                total_rsvps: 7,
            },
            events_settled: true,
            stats_settled: true,
            ..DirectoryState::default()
        }
    }

    #[test]
    fn showing_pluralises() {
        assert_eq!(showing(0), "Showing 0 events");
        assert_eq!(showing(1), "Showing 1 event");
        assert_eq!(showing(2), "Showing 2 events");
    }

    #[test]
    fn directory_lists_cards_with_badges() {
        let text = directory(&loaded_directory(), now());

        assert!(text.contains("Events: 2  Attendees: 5  RSVPs: 7"));
        assert!(text.contains("Showing 2 events"));
        assert!(text.contains("• Evening Social [Today]"));
        assert!(text.contains("6:00 PM - 8:00 PM"));
        assert!(text.contains("@ Innovation Hub"));
        assert!(text.contains("• Old Meetup [Past Event] (ended)"));
        assert!(text.contains("Details: /event/1"));
    }

    #[test]
    fn directory_empty_search_explains() {
        let state = DirectoryState {
            query: "quantum".into(),
            ..loaded_directory()
        };
        let text = directory(&state, now());

        assert!(text.contains("Showing 0 events"));
        assert!(text.contains("No events found"));
        assert!(text.contains("matching \"quantum\""));
    }

    #[test]
    fn directory_before_load() {
        assert!(directory(&DirectoryState::default(), now()).ends_with("Loading..."));
    }

    #[test]
    fn detail_shows_share_state_and_rsvp() {
        let mut state = DetailState {
            id: Some(Id::from(1)),
            page: DetailPage::Loaded(event(1, "Evening Social", Some(wall(2024, 6, 15, 18, 0)))),
            ..DetailState::default()
        };

        let text = detail(&state, now());
        assert!(text.contains("Saturday, June 15, 2024"));
        assert!(text.contains("RSVP: /rsvp/1"));
        assert!(text.contains("Share Event"));

        state.copied = true;
        assert!(detail(&state, now()).contains("Link Copied!"));

        let later = wall(2024, 6, 16, 9, 0);
        let text = detail(&state, later);
        assert!(!text.contains("RSVP:"));
        assert!(text.contains("This event has ended"));
    }

    #[test]
    fn detail_not_found_leads_back() {
        let state = DetailState {
            page: DetailPage::NotFound,
            ..DetailState::default()
        };
        let text = detail(&state, now());

        assert!(text.starts_with("Event Not Found"));
        assert!(text.ends_with(BACK));
    }

    #[test]
    fn status_picker_marks_the_choice() {
        assert_eq!(
            status_options(AttendeeStatus::Working),
            "( ) Student\n(•) Working Professional\n( ) Other"
        );
    }

    fn ready(form: RsvpForm) -> RsvpState {
        RsvpState {
            id: Some(Id::from(3)),
            page: RsvpPage::Ready(Box::new(form)),
        }
    }

    #[test]
    fn rsvp_form_shows_errors_and_search() {
        let mut form = RsvpForm::new(event(3, "Networking Night", Some(wall(2024, 6, 25, 18, 0))));
        form.mode = Mode::Returning;
        form.search.query = "Jane".into();
        form.search.results = vec![Attendee {
            id: Id::from(1),
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            contact: None,
            status: AttendeeStatus::Working,
        }];
        form.errors.insert(Field::Email, "Email is required".into());
        form.submit_error = Some("You have already registered for this event!".into());

        let text = rsvp(&ready(form), now());
        assert!(text.contains("[Returning attendee]"));
        assert!(text.contains("1. Jane Doe <jane@example.com>"));
        assert!(text.contains("  ! Email is required"));
        assert!(text.contains("! You have already registered for this event!"));
        assert!(text.contains("Status: Student"));
        assert!(!text.contains(NO_MATCHES));
    }

    #[test]
    fn rsvp_no_matches_hint() {
        let mut form = RsvpForm::new(event(3, "Networking Night", None));
        form.mode = Mode::Returning;
        form.search.query = "Zed".into();

        assert!(rsvp(&ready(form), now()).contains(NO_MATCHES));
    }

    #[test]
    fn rsvp_confirmation() {
        let mut form = RsvpForm::new(event(3, "Networking Night", None));
        form.draft.email = "ada@example.com".into();
        form.submission = Submission::Succeeded { attendance_id: Some(9) };

        let text = rsvp(&ready(form), now());
        assert!(text.starts_with("You're All Set!"));
        assert!(text.contains("Your RSVP for Networking Night has been confirmed."));
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("Attendance #9"));
    }

    #[test]
    fn rsvp_not_found() {
        let state = RsvpState {
            page: RsvpPage::NotFound,
            ..RsvpState::default()
        };
        assert!(rsvp(&state, now()).starts_with("Event Not Found"));
    }
}
