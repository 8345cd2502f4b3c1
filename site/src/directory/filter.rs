//! Search and bucket predicates.

use super::types::Bucket;
use crate::types::Event;
use chrono::NaiveDateTime;

/// Case-insensitive substring match on name, venue or description.
/// An empty query matches everything.
#[must_use]
pub fn matches_text(event: &Event, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    contains(event.name.as_str())
        || event.venue.as_deref().is_some_and(contains)
        || event.description.as_deref().is_some_and(contains)
}

/// Bucket membership. Events without a start only belong to [`Bucket::All`].
#[must_use]
pub fn in_bucket(event: &Event, bucket: Bucket, now: NaiveDateTime) -> bool {
    match bucket {
        Bucket::All => true,
        Bucket::Upcoming => event.datetime.is_some_and(|at| at >= now),
        Bucket::Past => event.datetime.is_some_and(|at| at < now),
    }
}

/// Events matching both predicates, order preserved.
#[must_use]
pub fn apply<'a>(
    events: &'a [Event],
    query: &str,
    bucket: Bucket,
    now: NaiveDateTime,
) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| matches_text(event, query) && in_bucket(event, bucket, now))
        .collect()
}
