//! Unit tests for the directory reducer and its filters.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use super::filter::{in_bucket, matches_text};
use super::reducer::{FETCH_EVENTS, FETCH_STATS};
use super::*;
use crate::api::{ApiError, Endpoint, InMemoryEventsApi};
use crate::environment::test_support::{env_with, event, wall};
use crate::types::{Event, Stats};
use attendeez_core::effect::Effect;
use attendeez_runtime::Store;
use attendeez_testing::{ReducerTest, assertions};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use std::sync::Arc;

fn now() -> NaiveDateTime {
    wall(2024, 6, 15, 10, 0)
}

fn catalogue() -> Vec<Event> {
    let mut jazz = event(1, "Jazz Night", Some(wall(2024, 6, 10, 20, 0)));
    jazz.venue = Some("Blue Note".into());

    let mut summit = event(2, "Tech Summit", Some(wall(2024, 6, 20, 9, 0)));
    summit.description = Some("Talks about RUST and more".into());

    let tbd = event(3, "Mystery Meetup", None);

    let mut today = event(4, "Evening Social", Some(wall(2024, 6, 15, 18, 0)));
    today.venue = Some("Rooftop".into());

    vec![jazz, summit, tbd, today]
}

fn loaded(query: &str, bucket: Bucket) -> DirectoryState {
    DirectoryState {
        events: catalogue(),
        query: query.to_string(),
        bucket,
        ..DirectoryState::default()
    }
}

fn names(state: &DirectoryState) -> Vec<String> {
    state.visible(now()).into_iter().map(|e| e.name.clone()).collect()
}

fn env() -> crate::SiteEnvironment {
    env_with(Arc::new(InMemoryEventsApi::new()))
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn all_bucket_keeps_backend_order() {
    assert_eq!(
        names(&loaded("", Bucket::All)),
        ["Jazz Night", "Tech Summit", "Mystery Meetup", "Evening Social"]
    );
}

#[test]
fn upcoming_and_past_exclude_undated_events() {
    assert_eq!(names(&loaded("", Bucket::Upcoming)), ["Tech Summit", "Evening Social"]);
    assert_eq!(names(&loaded("", Bucket::Past)), ["Jazz Night"]);
}

#[test]
fn search_is_case_insensitive_over_name_venue_and_description() {
    assert_eq!(names(&loaded("jAzZ", Bucket::All)), ["Jazz Night"]);
    assert_eq!(names(&loaded("blue note", Bucket::All)), ["Jazz Night"]);
    assert_eq!(names(&loaded("rust", Bucket::All)), ["Tech Summit"]);
    assert!(names(&loaded("opera", Bucket::All)).is_empty());
}

#[test]
fn search_and_bucket_combine() {
    assert!(names(&loaded("jazz", Bucket::Upcoming)).is_empty());
    assert_eq!(names(&loaded("roof", Bucket::Upcoming)), ["Evening Social"]);
}

#[test]
fn bucket_names_parse() {
    assert_eq!("Upcoming".parse::<Bucket>(), Ok(Bucket::Upcoming));
    assert_eq!("past".parse::<Bucket>(), Ok(Bucket::Past));
    assert!("later".parse::<Bucket>().is_err());
}

#[test]
fn cards_follow_visible_events() {
    let cards = loaded("", Bucket::All).cards(now());

    assert_eq!(cards.len(), 4);
    assert!(cards[0].dimmed);
    assert!(cards[2].badge.is_none());
    assert_eq!(cards[3].badge, Some(crate::dates::DateBadge::Today));
}

proptest! {
    #[test]
    fn dated_events_fall_in_exactly_one_bucket(offset_minutes in -100_000i64..100_000) {
        let e = event(1, "x", Some(now() + Duration::minutes(offset_minutes)));

        prop_assert!(in_bucket(&e, Bucket::All, now()));
        prop_assert_ne!(
            in_bucket(&e, Bucket::Upcoming, now()),
            in_bucket(&e, Bucket::Past, now())
        );
        prop_assert_eq!(in_bucket(&e, Bucket::Past, now()), offset_minutes < 0);
    }

    #[test]
    fn text_match_ignores_case(name in "[a-zA-Z ]{1,20}", start in 0usize..20, len in 1usize..5) {
        let e = event(1, &name, None);
        let end = (start + len).min(name.len());
        let start = start.min(end);
        let fragment = &name[start..end];

        prop_assert!(matches_text(&e, &fragment.to_uppercase()));
        prop_assert!(matches_text(&e, &fragment.to_lowercase()));
    }
}

// ============================================================================
// Reducer
// ============================================================================

#[test]
fn mount_fetches_events_and_stats_concurrently() {
    ReducerTest::new(DirectoryReducer::new())
        .with_env(env())
        .given_state(DirectoryState::default())
        .when_action(DirectoryAction::Mount)
        .then_state(|state| assert!(!state.is_loaded()))
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            let Effect::Parallel(fetches) = &effects[0] else {
                panic!("expected parallel fetches, got {effects:?}");
            };
            assertions::assert_has_keyed_effect(fetches, FETCH_EVENTS);
            assertions::assert_has_keyed_effect(fetches, FETCH_STATS);
            assertions::assert_has_future_effect(fetches);
        })
        .run();
}

#[test]
fn loaded_only_after_both_requests_settle() {
    ReducerTest::new(DirectoryReducer::new())
        .with_env(env())
        .given_state(DirectoryState::default())
        .when_action(DirectoryAction::Mount)
        .when_action(DirectoryAction::EventsLoaded { events: catalogue() })
        .then_state(|state| {
            assert!(!state.is_loaded());
            assert_eq!(state.events.len(), 4);
        })
        .run();

    ReducerTest::new(DirectoryReducer::new())
        .with_env(env())
        .given_state(DirectoryState::default())
        .when_action(DirectoryAction::Mount)
        .when_action(DirectoryAction::EventsLoaded { events: catalogue() })
        .when_action(DirectoryAction::StatsFailed { error: ApiError::Timeout })
        .then_state(|state| {
            assert!(state.is_loaded());
            assert_eq!(state.stats, Stats::default());
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn events_failure_renders_empty_list() {
    ReducerTest::new(DirectoryReducer::new())
        .with_env(env())
        .given_state(loaded("", Bucket::All))
        .when_action(DirectoryAction::EventsFailed {
            error: ApiError::Transport("connection refused".into()),
        })
        .then_state(|state| {
            assert!(state.events.is_empty());
            assert!(state.visible(now()).is_empty());
        })
        .run();
}

#[test]
fn query_and_bucket_changes_are_local() {
    ReducerTest::new(DirectoryReducer::new())
        .with_env(env())
        .given_state(loaded("", Bucket::All))
        .when_action(DirectoryAction::QueryChanged { query: "summit".into() })
        .when_action(DirectoryAction::BucketSelected { bucket: Bucket::Upcoming })
        .then_state(|state| {
            assert_eq!(state.query, "summit");
            assert_eq!(state.bucket, Bucket::Upcoming);
            assert_eq!(names(state), ["Tech Summit"]);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

// ============================================================================
// Store
// ============================================================================

#[tokio::test]
async fn mount_through_store_loads_sample_catalogue() {
    let api = Arc::new(InMemoryEventsApi::sample(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
    let store = Store::new(DirectoryState::default(), DirectoryReducer::new(), env_with(api));

    store.send(DirectoryAction::Mount).await.unwrap().wait().await;

    let state = store.state(Clone::clone).await;
    assert!(state.is_loaded());
    assert_eq!(state.events.len(), 3);
    assert_eq!(state.stats.total_events, 3);
    assert_eq!(state.stats.total_rsvps, 1);
}

#[tokio::test]
async fn stats_outage_does_not_block_events() {
    let api = Arc::new(InMemoryEventsApi::sample(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
    api.fail(Endpoint::Stats);
    let store = Store::new(DirectoryState::default(), DirectoryReducer::new(), env_with(api));

    store.send(DirectoryAction::Mount).await.unwrap().wait().await;

    let state = store.state(Clone::clone).await;
    assert!(state.is_loaded());
    assert_eq!(state.events.len(), 3);
    assert_eq!(state.stats, Stats::default());
}
