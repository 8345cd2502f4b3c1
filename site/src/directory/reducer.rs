//! Reducer for the event directory.

use super::{DirectoryAction, DirectoryState};
use crate::environment::SiteEnvironment;
use crate::types::Stats;
use attendeez_core::effect::{Effect, EffectId};
use attendeez_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};

/// Key of the in-flight event list request
pub const FETCH_EVENTS: EffectId = EffectId::new("directory.fetch_events");

/// Key of the in-flight stats request
pub const FETCH_STATS: EffectId = EffectId::new("directory.fetch_stats");

/// Reducer for the directory view.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryReducer;

impl DirectoryReducer {
    /// Create a new directory reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for DirectoryReducer {
    type State = DirectoryState;
    type Action = DirectoryAction;
    type Environment = SiteEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DirectoryAction::Mount => {
                state.events_settled = false;
                state.stats_settled = false;

                let api = env.api();
                let fetch_events = Effect::future(async move {
                    Some(match api.list_events().await {
                        Ok(events) => DirectoryAction::EventsLoaded { events },
                        Err(error) => DirectoryAction::EventsFailed { error },
                    })
                })
                .cancellable(FETCH_EVENTS);

                let api = env.api();
                let fetch_stats = Effect::future(async move {
                    Some(match api.stats().await {
                        Ok(stats) => DirectoryAction::StatsLoaded { stats },
                        Err(error) => DirectoryAction::StatsFailed { error },
                    })
                })
                .cancellable(FETCH_STATS);

                smallvec![Effect::merge(vec![fetch_events, fetch_stats])]
            },

            DirectoryAction::EventsLoaded { events } => {
                tracing::debug!(count = events.len(), "Events loaded");
                state.events = events;
                state.events_settled = true;
                SmallVec::new()
            },

            DirectoryAction::EventsFailed { error } => {
                tracing::warn!(%error, "Failed to load events");
                state.events.clear();
                state.events_settled = true;
                SmallVec::new()
            },

            DirectoryAction::StatsLoaded { stats } => {
                state.stats = stats;
                state.stats_settled = true;
                SmallVec::new()
            },

            DirectoryAction::StatsFailed { error } => {
                tracing::warn!(%error, "Failed to load stats");
                state.stats = Stats::default();
                state.stats_settled = true;
                SmallVec::new()
            },

            DirectoryAction::QueryChanged { query } => {
                state.query = query;
                SmallVec::new()
            },

            DirectoryAction::BucketSelected { bucket } => {
                state.bucket = bucket;
                SmallVec::new()
            },
        }
    }
}
