//! # Attendeez Runtime
//!
//! The Store that drives an Attendeez view.
//!
//! ## Core Components
//!
//! - **Store**: owns the view state, runs the reducer and executes effects
//! - **Effect Executor**: spawns effect work and feeds produced actions back
//! - **Keyed effects**: `Effect::Cancellable` work is registered under its
//!   [`EffectId`] and aborted when replaced or cancelled
//!
//! ## Example
//!
//! ```ignore
//! use attendeez_runtime::Store;
//!
//! let store = Store::new(DetailState::default(), DetailReducer::new(), env);
//!
//! let mut handle = store.send(DetailAction::Mount { id }).await?;
//! handle.wait().await;
//!
//! let loaded = store.state(|s| s.event().is_some()).await;
//! ```

use attendeez_core::effect::{Effect, EffectId};
use attendeez_core::reducer::Reducer;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for effects to settle
        #[error("Timed out after {0:?} waiting for effects")]
        Timeout(std::time::Duration),
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. The handle tracks the whole cascade: effects
/// started by the action, and effects started by actions those effects fed
/// back into the store.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(DirectoryAction::Mount).await?;
/// handle.wait().await;
/// // Both the events and the stats request have completed
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Number of tracked effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait until every tracked effect has finished or been cancelled
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                return;
            }
        }
    }

    /// Wait for all effects to complete, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when the
    /// timeout expires.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout(timeout))
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: completion counter shared by every effect of one cascade
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notifier.send_replace(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs on normal completion, on panic, and when a keyed effect is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Internal: a keyed effect that is still running
struct InFlight {
    generation: u64,
    abort: tokio::task::AbortHandle,
}

type InFlightRegistry = Arc<Mutex<HashMap<EffectId, InFlight>>>;

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicU64, BoxFuture, DecrementGuard, Duration, Effect, EffectHandle,
        EffectId, EffectTracking, HashMap, InFlight, InFlightRegistry, Mutex, Ordering,
        PoisonError, Reducer, RwLock, StoreError, broadcast,
    };

    /// The Store - runtime coordinator for one view
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer runs under the write lock)
    /// 2. Reducer (view logic)
    /// 3. Environment (API client, clock, clipboard)
    /// 4. Effect execution, with produced actions fed back into the reducer
    /// 5. Keyed effects that can be replaced or cancelled by id
    ///
    /// Clones share the same state and effect registry.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        in_flight: InFlightRegistry,
        generation: Arc<AtomicU64>,
        /// Actions produced by effects, for observers (the CLI prints
        /// acknowledgements from here)
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Clone + Send + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                in_flight: Arc::new(Mutex::new(HashMap::new())),
                generation: Arc::new(AtomicU64::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// Returns once the effects are started. Use the returned
        /// [`EffectHandle`] to wait for them (and for everything they cascade
        /// into) to finish.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] after [`Store::shutdown`].
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            let (handle, tracking) = EffectHandle::new();
            self.send_tracked(action, tracking).await?;
            Ok(handle)
        }

        async fn send_tracked(&self, action: A, tracking: EffectTracking) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!(?action, "Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let visible = store.state(|s| s.visible(now).len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to actions produced by effects
        ///
        /// Only feedback actions are broadcast, not the actions passed to
        /// [`Store::send`].
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Stop accepting actions and abort every keyed effect still in flight
        pub fn shutdown(&self) {
            tracing::info!("Shutting down store");
            self.shutdown.store(true, Ordering::Release);

            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            for (id, entry) in in_flight.drain() {
                tracing::debug!(effect_id = %id, "Aborting keyed effect");
                entry.abort.abort();
            }
        }

        /// Number of keyed effects currently registered
        #[must_use]
        pub fn keyed_effects(&self) -> usize {
            self.in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    self.spawn_tracked(fut, tracking);
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!(?duration, "Executing Effect::Delay");
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    self.spawn_tracked(delayed(duration, *action), tracking);
                },
                Effect::Cancellable { id, effect } => {
                    metrics::counter!("store.effects.executed", "type" => "cancellable")
                        .increment(1);
                    match *effect {
                        Effect::Future(fut) => self.spawn_keyed(id, fut, tracking),
                        Effect::Delay { duration, action } => {
                            self.spawn_keyed(id, delayed(duration, *action), tracking);
                        },
                        other => {
                            tracing::warn!(
                                effect_id = %id,
                                "Only Future and Delay effects can be keyed; running unkeyed"
                            );
                            self.execute_effect(other, tracking);
                        },
                    }
                },
                Effect::Cancel(id) => {
                    metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                    let removed = self
                        .in_flight
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(&id);
                    if let Some(entry) = removed {
                        tracing::debug!(effect_id = %id, "Cancelled keyed effect");
                        entry.abort.abort();
                    }
                },
            }
        }

        fn spawn_tracked(
            &self,
            fut: BoxFuture<'static, Option<A>>,
            tracking: &EffectTracking,
        ) -> tokio::task::JoinHandle<()> {
            tracking.increment();
            let guard = DecrementGuard(tracking.clone());
            let tracking = tracking.clone();
            let store = self.clone();

            tokio::spawn(async move {
                let _guard = guard;

                if let Some(action) = fut.await {
                    let _ = store.action_broadcast.send(action.clone());
                    if let Err(error) = store.send_tracked(action, tracking).await {
                        tracing::debug!(%error, "Dropped feedback action");
                    }
                }
            })
        }

        fn spawn_keyed(
            &self,
            id: EffectId,
            fut: BoxFuture<'static, Option<A>>,
            tracking: &EffectTracking,
        ) {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(previous) = in_flight.remove(&id) {
                tracing::debug!(effect_id = %id, "Replacing in-flight keyed effect");
                previous.abort.abort();
            }

            let generation = self.generation.fetch_add(1, Ordering::SeqCst);
            let registry = Arc::clone(&self.in_flight);
            let keyed = Box::pin(async move {
                let action = fut.await;
                let mut in_flight = registry.lock().unwrap_or_else(PoisonError::into_inner);
                if in_flight.get(&id).is_some_and(|entry| entry.generation == generation) {
                    in_flight.remove(&id);
                }
                action
            });

            let handle = self.spawn_tracked(keyed, tracking);
            in_flight.insert(
                id,
                InFlight {
                    generation,
                    abort: handle.abort_handle(),
                },
            );
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                in_flight: Arc::clone(&self.in_flight),
                generation: Arc::clone(&self.generation),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }

    fn delayed<A: Send + 'static>(duration: Duration, action: A) -> BoxFuture<'static, Option<A>> {
        Box::pin(async move {
            tokio::time::sleep(duration).await;
            Some(action)
        })
    }
}

pub use store::Store;
