//! Store runtime.
//!
//! The [`Store`] owns the state, serializes every action through the reducer
//! under a write lock, then executes the returned effects on the tokio
//! runtime. Actions produced by effects are fed back through the same reducer.
//!
//! ```ignore
//! let store = Store::new(ReservationState::new(), ReservationReducer::new(), env);
//!
//! let handle = store.send(ReservationAction::LoadCatalog).await?;
//! handle.wait().await;
//!
//! let movies = store.state(|s| s.movies.len()).await;
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use futures::future::{join_all, BoxFuture};
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Waiting for an effect cascade took longer than allowed
        #[error("Timed out waiting for effects to complete")]
        Timeout,

        /// An effect task panicked or was aborted
        #[error("Effect task failed: {0}")]
        EffectFailed(String),
    }
}

pub use error::StoreError;

/// Handle to the effect cascade started by one `send`.
///
/// Dropping the handle does not cancel anything; effects keep running.
#[derive(Debug)]
pub struct EffectHandle {
    task: Option<JoinHandle<()>>,
}

impl EffectHandle {
    /// A handle for an action that produced no effects
    #[must_use]
    pub const fn completed() -> Self {
        Self { task: None }
    }

    /// Whether this handle tracks running effects
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.task.is_none()
    }

    /// Wait until every effect, and every action fed back by those effects,
    /// has been processed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EffectFailed`] if the effect task panicked.
    pub async fn wait(self) -> Result<(), StoreError> {
        match self.task {
            None => Ok(()),
            Some(task) => task.await.map_err(|error| {
                tracing::error!(error = %error, "Effect task failed");
                StoreError::EffectFailed(error.to_string())
            }),
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the cascade is still running after
    /// `timeout`, or [`StoreError::EffectFailed`] if it panicked.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

/// Decrements the pending effect counter even if the effect task panics.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// The Store - runtime coordinator for a reducer
///
/// Cloning a store is cheap and every clone shares the same state.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Send an action to the store
    ///
    /// The reducer runs while the write lock is held; effects run afterwards
    /// in a spawned task. The returned [`EffectHandle`] resolves once that
    /// task has finished.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        let ((), handle) = self.send_with(action, |_| ()).await?;
        Ok(handle)
    }

    /// Send an action and inspect the resulting state before any other
    /// action can run.
    ///
    /// `inspect` is evaluated under the same write lock as the reducer, so it
    /// observes exactly the state this action produced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub async fn send_with<F, T>(&self, action: A, inspect: F) -> Result<(T, EffectHandle), StoreError>
    where
        F: FnOnce(&S) -> T,
    {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejecting action, store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions").increment(1);

        let (effects, inspected) = {
            let mut state = self.state.write().await;
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            let inspected = inspect(&state);
            (effects, inspected)
        };

        Ok((inspected, self.spawn_effects(effects)))
    }

    /// Read current state via a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Number of effect cascades still running
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::Acquire)
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Stop accepting actions and wait for running effects to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` elapses.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);
            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }
            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn spawn_effects(&self, effects: SmallVec<[Effect<A>; 4]>) -> EffectHandle {
        if effects.iter().all(Effect::is_none) {
            return EffectHandle::completed();
        }

        metrics::counter!("store.effects").increment(effects.len() as u64);
        self.pending_effects.fetch_add(1, Ordering::AcqRel);

        let store = self.clone();
        let task = tokio::spawn(async move {
            let _guard = PendingGuard(Arc::clone(&store.pending_effects));
            join_all(effects.into_iter().map(|effect| store.execute(effect))).await;
        });

        EffectHandle { task: Some(task) }
    }

    fn execute(&self, effect: Effect<A>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    join_all(effects.into_iter().map(|effect| self.execute(effect))).await;
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        self.execute(effect).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    self.feed_back(*action).await;
                },
                Effect::Future(future) => {
                    if let Some(action) = future.await {
                        self.feed_back(action).await;
                    }
                },
            }
        })
    }

    async fn feed_back(&self, action: A) {
        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };
        join_all(effects.into_iter().map(|effect| self.execute(effect))).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[derive(Debug, Default)]
    struct Counter {
        value: i64,
        loaded: bool,
    }

    #[derive(Debug, Clone)]
    enum CounterAction {
        Increment,
        Load,
        Loaded(i64),
        LoadLater,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = Counter;
        type Action = CounterAction;
        type Environment = i64;

        fn reduce(
            &self,
            state: &mut Counter,
            action: CounterAction,
            env: &i64,
        ) -> SmallVec<[Effect<CounterAction>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                CounterAction::Load => {
                    let seed = *env;
                    smallvec![Effect::future(async move { Some(CounterAction::Loaded(seed)) })]
                },
                CounterAction::Loaded(value) => {
                    state.value = value;
                    state.loaded = true;
                    SmallVec::new()
                },
                CounterAction::LoadLater => smallvec![Effect::Delay {
                    duration: Duration::from_millis(5),
                    action: Box::new(CounterAction::Load),
                }],
            }
        }
    }

    #[tokio::test]
    async fn send_applies_action() {
        let store = Store::new(Counter::default(), CounterReducer, 0);
        let handle = store.send(CounterAction::Increment).await.unwrap();
        assert!(handle.is_completed());
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn wait_covers_feedback_actions() {
        let store = Store::new(Counter::default(), CounterReducer, 42);
        let handle = store.send(CounterAction::Load).await.unwrap();
        handle.wait().await.unwrap();
        assert!(store.state(|s| s.loaded).await);
        assert_eq!(store.state(|s| s.value).await, 42);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn delayed_actions_cascade() {
        let store = Store::new(Counter::default(), CounterReducer, 7);
        let handle = store.send(CounterAction::LoadLater).await.unwrap();
        handle.wait_with_timeout(Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 7);
    }

    #[tokio::test]
    async fn send_with_sees_post_reduce_state() {
        let store = Store::new(Counter::default(), CounterReducer, 0);
        store.send(CounterAction::Increment).await.unwrap();
        let (value, _) = store
            .send_with(CounterAction::Increment, |s| s.value)
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_actions() {
        let store = Store::new(Counter::default(), CounterReducer, 0);
        store.shutdown(Duration::from_secs(1)).await.unwrap();
        assert!(store.is_shutting_down());
        let result = store.send(CounterAction::Increment).await;
        assert_eq!(result.unwrap_err(), StoreError::ShutdownInProgress);
    }
}
