//! # Attendeez Core
//!
//! The abstractions every Attendeez view is written against.
//!
//! A view (event directory, event detail, RSVP form) is modelled as:
//!
//! - **State**: everything the view renders from
//! - **Action**: user input plus the completions of its own requests and timers
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`, synchronous and pure
//! - **Effect**: a description of work (HTTP call, timer) for the runtime to perform
//! - **Environment**: injected collaborators (API client, clock, clipboard)
//!
//! Reducers never perform I/O themselves. That keeps every transition of the
//! RSVP workflow testable without a network or a wall clock.
//!
//! ## Example
//!
//! ```ignore
//! use attendeez_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = u32;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut u32,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         *state += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the trait every view implements
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - owns all state transitions of a view
    ///
    /// # Type Parameters
    ///
    /// - `State`: The view state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns descriptions of the work the
        /// runtime should perform. Most actions produce zero or one effect, so
        /// the return type stays on the stack.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values. The runtime executes them and feeds any action they
/// produce back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Identifies an in-flight effect so it can be replaced or cancelled.
    ///
    /// Ids are static names scoped to one store, e.g. the share reversion timer
    /// of a detail view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create an effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn name(&self) -> &'static str {
            self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Dispatch an action after a delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, cancelling whatever is still in flight
        /// under the same id first
        Cancellable {
            /// Key of the in-flight effect
            id: EffectId,
            /// The keyed effect (a `Delay` or a `Future`)
            effect: Box<Effect<Action>>,
        },

        /// Cancel the in-flight effect registered under this id, if any
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Key this effect so that a later effect with the same id replaces it
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - dependency injection traits shared by all views
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Date badges and the upcoming/past split depend on "now"; views read it
    /// through this trait so tests can pin it.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)] // Test code
mod tests {
    use super::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Pong,
    }

    #[test]
    fn cancellable_wraps_the_effect_under_its_id() {
        const TIMER: EffectId = EffectId::new("timer");

        let effect = Effect::Delay {
            duration: Duration::from_secs(2),
            action: Box::new(Ping::Pong),
        }
        .cancellable(TIMER);

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, TIMER);
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn debug_hides_future_bodies() {
        let effect: Effect<Ping> = Effect::future(async { Some(Ping::Pong) });
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn future_effect_resolves_to_its_action() {
        let effect: Effect<Ping> = Effect::future(async { Some(Ping::Pong) });
        let Effect::Future(fut) = effect else {
            unreachable!("constructor builds a future effect");
        };
        assert_eq!(tokio_test::block_on(fut), Some(Ping::Pong));
    }
}
