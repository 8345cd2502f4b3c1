//! # Attendeez Testing
//!
//! Testing utilities for Attendeez reducers.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then builder for a single reducer step
//! - Effect assertions
//! - A [`FixedClock`] so date badges and bucket filters are deterministic
//!
//! ## Example
//!
//! ```ignore
//! use attendeez_testing::{ReducerTest, at};
//!
//! ReducerTest::new(RsvpReducer::new())
//!     .with_env(test_env(at("2024-06-15T10:00:00Z")))
//!     .given_state(ready_state())
//!     .when_action(RsvpAction::Submit)
//!     .then_state(|state| assert!(state.is_submitting()))
//!     .run();
//! ```

use attendeez_core::environment::Clock;
use chrono::{DateTime, Utc};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same instant until moved with [`FixedClock::set`].
    ///
    /// # Example
    ///
    /// ```
    /// use attendeez_core::environment::Clock;
    /// use attendeez_testing::mocks::FixedClock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock to another instant
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Parse an RFC 3339 instant for use in tests
    ///
    /// # Panics
    ///
    /// Panics if `rfc3339` is not a valid RFC 3339 timestamp.
    #[must_use]
    #[allow(clippy::expect_used)] // Test helper
    pub fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("test timestamp should be valid RFC 3339")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2024-06-15 10:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(at("2024-06-15T10:00:00Z"))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, at, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), at("2024-06-15T10:00:00Z"));
    }

    #[test]
    fn test_fixed_clock_can_be_moved() {
        let clock = test_clock();
        clock.set(at("2024-06-16T09:00:00Z"));
        assert_eq!(clock.now(), at("2024-06-16T09:00:00Z"));
    }
}
