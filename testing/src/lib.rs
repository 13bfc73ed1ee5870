//! # Task List Testing
//!
//! Testing utilities and helpers for reducers built on `tasklist-core`.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{test_clock, ReducerTest, ScriptedIds};
//!
//! ReducerTest::new(TaskReducer::new())
//!     .with_env(TaskEnvironment::new(Arc::new(test_clock()), Arc::new(ScriptedIds::new([5]))))
//!     .given_state(TaskState::new())
//!     .when_action(TaskAction::AddTask { text: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.tasks.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tasklist_core::environment::{Clock, IdGenerator};


pub use reducer_test::ReducerTest;

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::FixedClock;
    /// use tasklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Id generator that hands out a scripted list first, then counts upward
    ///
    /// Once the script runs out, identifiers continue from one past the
    /// largest value seen so far, so the scripted values are never repeated.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::ScriptedIds;
    /// use tasklist_core::environment::IdGenerator;
    ///
    /// let ids = ScriptedIds::new([7, 8]);
    /// assert_eq!(ids.next_id(), 7);
    /// assert_eq!(ids.next_id(), 8);
    /// assert_eq!(ids.next_id(), 9);
    /// ```
    #[derive(Debug, Default)]
    pub struct ScriptedIds {
        inner: Mutex<ScriptedInner>,
    }

    #[derive(Debug, Default)]
    struct ScriptedInner {
        script: VecDeque<u64>,
        highest: u64,
    }

    impl ScriptedIds {
        /// Create a generator that yields `script` in order
        #[must_use]
        pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
            Self {
                inner: Mutex::new(ScriptedInner {
                    script: script.into_iter().collect(),
                    highest: 0,
                }),
            }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> u64 {
            // A poisoned lock still holds a consistent counter
            let mut inner = self
                .inner
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let id = match inner.script.pop_front() {
                Some(id) => id,
                None => inner.highest + 1,
            };
            inner.highest = inner.highest.max(id);
            id
        }
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, ScriptedIds};
