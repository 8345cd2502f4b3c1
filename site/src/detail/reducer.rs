//! Reducer for the event detail page.

use super::{DetailAction, DetailPage, DetailState};
use crate::clipboard::copy_with_fallback;
use crate::environment::SiteEnvironment;
use crate::router::Route;
use attendeez_core::effect::{Effect, EffectId};
use attendeez_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};
use std::time::Duration;

/// How long the "copied" acknowledgment stays up
pub const COPY_ACK_WINDOW: Duration = Duration::from_secs(2);

/// Key of the in-flight event fetch
pub const FETCH_EVENT: EffectId = EffectId::new("detail.fetch_event");

/// Key of the pending "copied" reversion
pub const COPY_REVERT: EffectId = EffectId::new("detail.copy_revert");

/// Reducer for the detail view.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailReducer;

impl DetailReducer {
    /// Create a new detail reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for DetailReducer {
    type State = DetailState;
    type Action = DetailAction;
    type Environment = SiteEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DetailAction::Mount { id } => {
                state.id = Some(id.clone());
                state.page = DetailPage::Loading;
                state.copied = false;
                // A copy still in flight belongs to the previous page
                state.share_generation += 1;

                let api = env.api();
                smallvec![
                    Effect::Cancel(COPY_REVERT),
                    Effect::future(async move {
                        Some(match api.event(&id).await {
                            Ok(event) => DetailAction::EventLoaded { event },
                            Err(error) => DetailAction::EventMissing { error },
                        })
                    })
                    .cancellable(FETCH_EVENT),
                ]
            },

            DetailAction::EventLoaded { event } => {
                tracing::debug!(id = %event.id, "Event loaded");
                state.page = DetailPage::Loaded(event);
                SmallVec::new()
            },

            DetailAction::EventMissing { error } => {
                tracing::warn!(id = ?state.id, %error, "Event not available");
                state.page = DetailPage::NotFound;
                SmallVec::new()
            },

            DetailAction::Share => {
                let Some(event) = state.event() else {
                    return SmallVec::new();
                };

                let url = Route::Event(event.id.clone()).url(env.public_url());
                state.share_generation += 1;
                let generation = state.share_generation;

                let primary = env.clipboard();
                let fallback = env.clipboard_fallback();
                smallvec![
                    Effect::Cancel(COPY_REVERT),
                    Effect::future(async move {
                        let path = copy_with_fallback(primary.as_ref(), fallback.as_ref(), &url);
                        Some(DetailAction::LinkCopied { generation, path })
                    }),
                ]
            },

            DetailAction::LinkCopied { generation, path } => {
                if generation != state.share_generation {
                    return SmallVec::new();
                }

                tracing::debug!(?path, "Share link copied");
                state.copied = true;
                smallvec![
                    Effect::Delay {
                        duration: COPY_ACK_WINDOW,
                        action: Box::new(DetailAction::CopyExpired { generation }),
                    }
                    .cancellable(COPY_REVERT)
                ]
            },

            DetailAction::CopyExpired { generation } => {
                if generation == state.share_generation {
                    state.copied = false;
                }
                SmallVec::new()
            },
        }
    }
}
