//! Path routing: `/`, `/event/{id}` and `/rsvp/{id}`.

use crate::types::EventId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A page of the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Directory,
    /// `/event/{id}`
    Event(EventId),
    /// `/rsvp/{id}`
    Rsvp(EventId),
}

/// Error returned for paths that are not part of the site
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No page at {0}")]
pub struct RouteError(pub String);

impl Route {
    /// Parse a path. A trailing slash and a query string are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] for unknown paths and empty ids.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let unknown = || RouteError(path.to_string());

        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Self::Directory),
            ["event", id] => Ok(Self::Event(EventId::new(*id))),
            ["rsvp", id] => Ok(Self::Rsvp(EventId::new(*id))),
            _ => Err(unknown()),
        }
    }

    /// The path of this page
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Directory => "/".to_string(),
            Self::Event(id) => format!("/event/{id}"),
            Self::Rsvp(id) => format!("/rsvp/{id}"),
        }
    }

    /// Absolute address of this page under `base_url`
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Ok(Route::Directory));
        assert_eq!(Route::parse(""), Ok(Route::Directory));
        assert_eq!(Route::parse("/event/12"), Ok(Route::Event(EventId::from(12))));
        assert_eq!(Route::parse("/rsvp/12/"), Ok(Route::Rsvp(EventId::from(12))));
        assert_eq!(Route::parse("/event/12?ref=mail"), Ok(Route::Event(EventId::from(12))));
    }

    #[test]
    fn rejects_unknown_paths() {
        assert!(Route::parse("/events").is_err());
        assert!(Route::parse("/event").is_err());
        assert!(Route::parse("/event/1/edit").is_err());
        assert_eq!(Route::parse("/admin"), Err(RouteError("/admin".into())));
    }

    #[test]
    fn renders_paths_and_urls() {
        let route = Route::Rsvp(EventId::from(3));
        assert_eq!(route.path(), "/rsvp/3");
        assert_eq!(Route::parse(&route.path()), Ok(route));
        assert_eq!(
            Route::Event(EventId::from(3)).url("https://events.example.com/"),
            "https://events.example.com/event/3"
        );
    }
}
