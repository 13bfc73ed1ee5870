//! # Task List Runtime
//!
//! Runtime implementation for the task list state container.
//!
//! This crate provides the Store runtime that owns a feature's state and
//! serializes actions through its reducer.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that owns state and applies actions one at a time
//! - **Action Broadcast**: Every processed action is published to observers
//! - **Shutdown**: Once shut down, the store rejects further actions
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tasklist_core::reducer::Reducer;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use tasklist_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
///
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for each lagging observer
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }.with_broadcast_capacity(broadcast_capacity)
    }

    /// Set the action broadcast capacity
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = if capacity == 0 { 1 } else { capacity };
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Arc, AtomicBool, Ordering, Reducer, RwLock, StoreConfig, StoreError};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; the reducer runs under the write lock)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    ///
    /// The Store is the only writer of its state. Actions apply one at a
    /// time in the order `send` acquires the lock.
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
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        shutdown: Arc<AtomicBool>,
        /// Every action processed by the store, after it was reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let store = Store::with_config(MyState::default(), MyReducer, env, config);
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Whether [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Shut the store down
        ///
        /// Sets the shutdown flag, then waits for any action already
        /// holding the write lock to finish. Once this returns, state no
        /// longer changes and `send` fails with
        /// [`StoreError::ShutdownInProgress`]. Calling it again is a no-op.
        pub async fn shutdown(&self) {
            if self.shutdown.swap(true, Ordering::AcqRel) {
                return;
            }
            tracing::info!("Initiating shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            // Drain the action in flight, if any
            drop(self.state.write().await);
            tracing::info!("Store shut down");
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Broadcasts the action to observers
        ///
        /// `send()` returns once the state transition is applied.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.is_shut_down() {
                return Err(self.reject());
            }

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            // Shutdown may have started while this call waited for the lock
            if self.is_shut_down() {
                return Err(self.reject());
            }

            metrics::counter!("store.actions.processed").increment(1);
            self.reducer
                .reduce(&mut *state, action.clone(), &*self.environment);

            // Observers see the action only once its state change is visible
            let _ = self.action_broadcast.send(action);
            drop(state);

            tracing::trace!("Reducer completed");
            Ok(())
        }

        fn reject(&self) -> StoreError {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            StoreError::ShutdownInProgress
        }

        /// Subscribe to every action the store processes
        ///
        /// Presentation layers use this to re-render after each state
        /// transition. Slow subscribers that fall behind by more than the
        /// configured broadcast capacity receive `RecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.tasks.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }
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
                config: self.config.clone(),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
            match action {
                TestAction::Increment => state.value += 1,
                TestAction::Decrement => state.value -= 1,
                TestAction::NoOp => {},
            }
        }
    }

    fn counter_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = counter_store();
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
        assert!(!store.is_shut_down());
    }

    #[tokio::test]
    async fn test_send_action() -> Result<(), StoreError> {
        let store = counter_store();
        store.send(TestAction::Increment).await?;
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_actions() -> Result<(), StoreError> {
        let store = counter_store();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::Increment).await?;
        store.send(TestAction::Decrement).await?;
        store.send(TestAction::NoOp).await?;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        Ok(())
    }

    #[tokio::test]
    #[allow(clippy::panic)] // Tests are allowed to panic on failures
    async fn test_concurrent_sends() {
        let store = counter_store();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::Increment).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 10);
    }

    #[tokio::test]
    async fn test_store_clone_shares_state() -> Result<(), StoreError> {
        let store1 = counter_store();
        let store2 = store1.clone();

        store1.send(TestAction::Increment).await?;
        assert_eq!(store2.state(|s| s.value).await, 1);

        store2.send(TestAction::Increment).await?;
        assert_eq!(store1.state(|s| s.value).await, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_broadcast_in_send_order() -> Result<(), StoreError> {
        let store = counter_store();
        let mut actions = store.subscribe_actions();

        store.send(TestAction::Increment).await?;
        store.send(TestAction::NoOp).await?;
        store.send(TestAction::Decrement).await?;

        let mut seen = Vec::new();
        while let Ok(action) = actions.try_recv() {
            seen.push(action);
        }
        assert_eq!(
            seen,
            vec![TestAction::Increment, TestAction::NoOp, TestAction::Decrement]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_told() -> Result<(), StoreError> {
        let config = StoreConfig::new(2);
        let store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);
        let mut actions = store.subscribe_actions();

        for _ in 0..4 {
            store.send(TestAction::Increment).await?;
        }

        assert!(matches!(
            actions.recv().await,
            Err(tokio::sync::broadcast::error::RecvError::Lagged(2))
        ));
        assert_eq!(store.state(|s| s.value).await, 4);
        Ok(())
    }

    mod shutdown_tests {
        use super::*;

        #[tokio::test]
        async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
            let store = counter_store();
            store.send(TestAction::Increment).await?;
            store.shutdown().await;

            assert!(store.is_shut_down());
            let result = store.send(TestAction::Increment).await;
            assert_eq!(result, Err(StoreError::ShutdownInProgress));
            assert_eq!(store.state(|s| s.value).await, 1);
            Ok(())
        }

        #[tokio::test]
        async fn test_shutdown_seen_by_clones() {
            let store = counter_store();
            let clone = store.clone();
            store.shutdown().await;

            assert!(clone.is_shut_down());
            assert!(clone.send(TestAction::Increment).await.is_err());
        }

        #[tokio::test]
        async fn test_shutdown_idempotent() {
            let store = counter_store();
            store.shutdown().await;
            store.shutdown().await;
            assert!(store.is_shut_down());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_store_config_default() {
            let config = StoreConfig::default();
            assert_eq!(config.broadcast_capacity, 16);
        }

        #[test]
        fn test_zero_capacity_is_raised() {
            assert_eq!(StoreConfig::default().with_broadcast_capacity(0).broadcast_capacity, 1);
            assert_eq!(StoreConfig::new(0).broadcast_capacity, 1);
        }

        #[tokio::test]
        async fn test_store_with_config() {
            let config = StoreConfig::new(4);
            let store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);
            assert_eq!(store.config().broadcast_capacity, 4);
        }
    }
}
