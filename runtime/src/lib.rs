//! # Skybook Runtime
//!
//! Runtime implementation for the Skybook booking controllers.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! effect handling:
//!
//! - **Store**: owns state, runs the reducer, executes effects
//! - **Feedback loop**: actions produced by effects are sent back to the
//!   reducer, which is how remote-call completions re-enter a state machine
//! - **Action broadcast**: every effect-produced action is also broadcast
//!   to observers, enabling request/terminal-action waiting
//!   ([`Store::send_and_wait_for`]) and event streaming
//!
//! ## Example
//!
//! ```ignore
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for its immediate effects
//! let mut handle = store.send(Action::Submit).await;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone()).await;
//! ```
//!
//! The store is single-writer by construction: the reducer runs under a
//! write lock, so shared state is only ever mutated by its own handlers.
//! There is no request de-duplication and no timeout on outstanding
//! effects; callers gate repeated submissions on their own loading flags.

use skybook_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while waiting on Store operations.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for a terminal action.
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed.
        ///
        /// All store clones were dropped while an observer was waiting.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion.
///
/// Returned by [`Store::send`] to allow waiting for the effects spawned
/// directly by that action. Effects triggered later by feedback actions get
/// their own handles; use [`Store::send_and_wait_for`] to wait for the end
/// of a multi-step chain.
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (notifier, completion) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion,
        };
        let tracking = EffectTracking { counter, notifier };

        (handle, tracking)
    }

    /// Create a handle that is already complete.
    ///
    /// Useful for initialization in loops where a `last_handle` is needed.
    #[must_use]
    pub fn completed() -> Self {
        let (notifier, completion) = watch::channel(());
        let _ = notifier.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion,
        }
    }

    /// Wait for all directly-spawned effects to complete.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all directly-spawned effects to complete, with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution.
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop.
///
/// Ensures the counter is decremented even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// The Store - runtime coordinator for a reducer.
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (transition logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Action broadcast channel for observing actions produced by effects.
    ///
    /// Only effect-produced actions are broadcast, not the actions passed
    /// to `send` directly.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (action_broadcast, _) = broadcast::channel(16);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Create a new store with a custom action broadcast capacity.
    ///
    /// Default capacity is 16. Increase if observers frequently lag.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Send an action to the store.
    ///
    /// Runs the reducer under the state write lock, then spawns the
    /// returned effects. The returned handle completes when the effects
    /// spawned *directly* by this action are done.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> EffectHandle {
        tracing::debug!("Processing action");

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        tracing::trace!("Reducer returned {} effects", effects.len());
        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        handle
    }

    /// Send an action and wait for a matching result action.
    ///
    /// Designed for multi-step effect chains (a remote-call sequence where
    /// each completion action triggers the next call): subscribe to the
    /// action broadcast, send the initial action, then wait for the first
    /// effect-produced action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: timeout expired before a matching action
    /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid a race with fast effects
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow observer; if the terminal action was among the
                        // dropped ones the timeout catches it.
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to all actions produced by this store's effects.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure.
    ///
    /// Access state through a closure so the read lock is released promptly:
    ///
    /// ```ignore
    /// let count = store.state(|s| s.bookings.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                tracking.increment();

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect produced an action, feeding back");

                        // Reduce first so observers of this action always
                        // see the post-transition state.
                        store.send(action.clone()).await;
                        let _ = store.action_broadcast.send(action);
                    } else {
                        tracing::trace!("Effect completed with no action");
                    }
                });
            },
            Effect::Parallel(effects) => {
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                for effect in effects {
                    self.execute_effect(effect, tracking.clone());
                }
            },
        }
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
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use skybook_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, Default)]
    struct PingState {
        pings: u32,
        pongs: u32,
    }

    #[derive(Debug, Clone)]
    enum PingAction {
        Ping,
        Pong,
        Burst,
    }

    #[derive(Clone)]
    struct PingReducer;

    impl Reducer for PingReducer {
        type State = PingState;
        type Action = PingAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            (): &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PingAction::Ping => {
                    state.pings += 1;
                    smallvec![Effect::future(async { Some(PingAction::Pong) })]
                },
                PingAction::Pong => {
                    state.pongs += 1;
                    smallvec![Effect::None]
                },
                PingAction::Burst => {
                    smallvec![Effect::merge(vec![
                        Effect::future(async { Some(PingAction::Pong) }),
                        Effect::future(async { Some(PingAction::Pong) }),
                        Effect::None,
                    ])]
                },
            }
        }
    }

    #[tokio::test]
    async fn feeds_effect_actions_back_into_the_reducer() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let result = store
            .send_and_wait_for(
                PingAction::Ping,
                |a| matches!(a, PingAction::Pong),
                Duration::from_secs(1),
            )
            .await;

        assert!(result.is_ok());
        let state = store.state(Clone::clone).await;
        assert_eq!(state.pings, 1);
        assert_eq!(state.pongs, 1);
    }

    #[tokio::test]
    async fn handle_waits_for_direct_effects() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let mut handle = store.send(PingAction::Ping).await;
        handle.wait().await;

        // The direct effect completed and its feedback was reduced before
        // the guard released the counter.
        assert_eq!(store.state(|s| s.pongs).await, 1);
    }

    #[tokio::test]
    async fn parallel_effects_all_run() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let mut handle = store.send(PingAction::Burst).await;
        handle.wait_with_timeout(Duration::from_secs(1)).await.unwrap();

        assert_eq!(store.state(|s| s.pongs).await, 2);
    }

    #[tokio::test]
    async fn wait_for_times_out_without_a_match() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let result = store
            .send_and_wait_for(
                PingAction::Pong,
                |a| matches!(a, PingAction::Ping),
                Duration::from_millis(50),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[test]
    fn completed_handle_is_immediately_done() {
        let mut handle = EffectHandle::completed();
        tokio_test::block_on(handle.wait());
    }
}
