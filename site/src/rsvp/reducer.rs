//! Reducer for the RSVP workflow.

use super::types::{Field, MIN_SEARCH_LEN, Mode, RsvpForm, RsvpPage, RsvpState, SUBMIT_FAILED, Submission};
use super::validation::validate;
use super::RsvpAction;
use crate::environment::SiteEnvironment;
use crate::types::{RsvpDraft, RsvpRequest};
use attendeez_core::effect::{Effect, EffectId};
use attendeez_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};

/// Key of the in-flight event fetch
pub const FETCH_EVENT: EffectId = EffectId::new("rsvp.fetch_event");

/// Key of the pending debounced lookup
pub const SEARCH_DEBOUNCE: EffectId = EffectId::new("rsvp.search_debounce");

/// Reducer for the RSVP view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsvpReducer;

impl RsvpReducer {
    /// Create a new RSVP reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn lookup(env: &SiteEnvironment, seq: u64, query: String) -> Effect<RsvpAction> {
        let api = env.api();
        Effect::future(async move {
            Some(match api.search_attendees(&query).await {
                Ok(results) => RsvpAction::SearchResults { seq, results },
                Err(error) => RsvpAction::SearchFailed { seq, error },
            })
        })
    }

    fn search_changed(
        form: &mut RsvpForm,
        query: String,
        env: &SiteEnvironment,
    ) -> SmallVec<[Effect<RsvpAction>; 4]> {
        let trimmed = query.trim().to_string();
        form.search.query = query;
        let seq = form.search.next();

        if trimmed.chars().count() < MIN_SEARCH_LEN {
            form.search.results.clear();
            form.search.searching = false;
            return smallvec![Effect::Cancel(SEARCH_DEBOUNCE)];
        }

        form.search.searching = true;
        let window = env.search_debounce();
        if window.is_zero() {
            smallvec![Self::lookup(env, seq, trimmed)]
        } else {
            smallvec![
                Effect::Delay {
                    duration: window,
                    action: Box::new(RsvpAction::SearchDue { seq, query: trimmed }),
                }
                .cancellable(SEARCH_DEBOUNCE)
            ]
        }
    }

    fn submit(form: &mut RsvpForm, env: &SiteEnvironment) -> SmallVec<[Effect<RsvpAction>; 4]> {
        if form.submission != Submission::Idle {
            tracing::debug!(submission = ?form.submission, "Submit ignored");
            return SmallVec::new();
        }

        form.errors = validate(&form.draft);
        form.submit_error = None;
        if !form.errors.is_empty() {
            tracing::debug!(fields = ?form.errors.keys().collect::<Vec<_>>(), "RSVP invalid");
            return SmallVec::new();
        }

        form.submission = Submission::Submitting;
        let request = RsvpRequest {
            draft: form.draft.clone(),
            event_id: form.event.id.clone(),
        };
        let api = env.api();
        smallvec![Effect::future(async move {
            Some(match api.submit_rsvp(&request).await {
                Ok(receipt) => RsvpAction::SubmitSucceeded { receipt },
                Err(error) => RsvpAction::SubmitFailed { error },
            })
        })]
    }
}

impl Reducer for RsvpReducer {
    type State = RsvpState;
    type Action = RsvpAction;
    type Environment = SiteEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RsvpAction::Mount { id } => {
                state.id = Some(id.clone());
                state.page = RsvpPage::Loading;

                let api = env.api();
                smallvec![
                    Effect::Cancel(SEARCH_DEBOUNCE),
                    Effect::future(async move {
                        Some(match api.event(&id).await {
                            Ok(event) => RsvpAction::EventLoaded { event },
                            Err(error) => RsvpAction::EventMissing { error },
                        })
                    })
                    .cancellable(FETCH_EVENT),
                ]
            },

            RsvpAction::EventLoaded { event } => {
                tracing::debug!(id = %event.id, "RSVP form ready");
                state.page = RsvpPage::Ready(Box::new(RsvpForm::new(event)));
                SmallVec::new()
            },

            RsvpAction::EventMissing { error } => {
                tracing::warn!(id = ?state.id, %error, "Event not available for RSVP");
                state.page = RsvpPage::NotFound;
                SmallVec::new()
            },

            action => match state.form_mut() {
                Some(form) if form.is_frozen() => {
                    tracing::debug!(?action, "RSVP already confirmed");
                    SmallVec::new()
                },
                Some(form) => Self::reduce_form(form, action, env),
                None => {
                    tracing::debug!(?action, "Form not ready");
                    SmallVec::new()
                },
            },
        }
    }
}

impl RsvpReducer {
    fn reduce_form(
        form: &mut RsvpForm,
        action: RsvpAction,
        env: &SiteEnvironment,
    ) -> SmallVec<[Effect<RsvpAction>; 4]> {
        match action {
            RsvpAction::SwitchMode { mode } => {
                form.mode = mode;
                if mode == Mode::Returning {
                    return SmallVec::new();
                }

                form.draft = RsvpDraft::default();
                form.search.query.clear();
                form.search.results.clear();
                form.search.searching = false;
                form.search.next();
                smallvec![Effect::Cancel(SEARCH_DEBOUNCE)]
            },

            RsvpAction::SearchChanged { query } => Self::search_changed(form, query, env),

            RsvpAction::SearchDue { seq, query } => {
                if seq != form.search.latest {
                    return SmallVec::new();
                }
                smallvec![Self::lookup(env, seq, query)]
            },

            RsvpAction::SearchResults { seq, results } => {
                if seq != form.search.latest {
                    tracing::warn!(seq, latest = form.search.latest, "Stale search response discarded");
                    return SmallVec::new();
                }
                tracing::debug!(seq, count = results.len(), "Search results");
                form.search.results = results;
                form.search.searching = false;
                SmallVec::new()
            },

            RsvpAction::SearchFailed { seq, error } => {
                if seq != form.search.latest {
                    tracing::warn!(seq, latest = form.search.latest, "Stale search failure discarded");
                    return SmallVec::new();
                }
                tracing::warn!(%error, "Attendee search failed");
                form.search.results.clear();
                form.search.searching = false;
                SmallVec::new()
            },

            RsvpAction::PickAttendee { attendee } => {
                tracing::debug!(id = %attendee.id, "Returning attendee picked");
                form.draft = RsvpDraft::from_attendee(&attendee);
                form.search.query.clear();
                form.search.results.clear();
                form.search.searching = false;
                form.search.next();
                smallvec![Effect::Cancel(SEARCH_DEBOUNCE)]
            },

            RsvpAction::EditField { field, value } => {
                match field {
                    Field::Name => form.draft.name = value,
                    Field::Email => form.draft.email = value,
                    Field::Contact => form.draft.contact = value,
                }
                form.errors.remove(&field);
                SmallVec::new()
            },

            RsvpAction::ToggleStatusPicker => {
                form.status_picker_open = !form.status_picker_open;
                SmallVec::new()
            },

            RsvpAction::SelectStatus { status } => {
                form.draft.status = status;
                form.status_picker_open = false;
                SmallVec::new()
            },

            RsvpAction::Submit => Self::submit(form, env),

            RsvpAction::SubmitSucceeded { receipt } => {
                if form.submission != Submission::Submitting {
                    return SmallVec::new();
                }
                tracing::info!(attendance_id = ?receipt.attendance_id, "RSVP confirmed");
                form.submission = Submission::Succeeded {
                    attendance_id: receipt.attendance_id,
                };
                SmallVec::new()
            },

            RsvpAction::SubmitFailed { error } => {
                if form.submission != Submission::Submitting {
                    return SmallVec::new();
                }
                tracing::warn!(%error, "RSVP refused");
                form.submit_error = Some(
                    error
                        .server_message()
                        .map_or_else(|| SUBMIT_FAILED.to_string(), str::to_string),
                );
                form.submission = Submission::Idle;
                SmallVec::new()
            },

            RsvpAction::Mount { .. } | RsvpAction::EventLoaded { .. } | RsvpAction::EventMissing { .. } => {
                SmallVec::new()
            },
        }
    }
}
