//! Task list state container.
//!
//! A single-user list of short text tasks held in memory. All business
//! rules live in [`TaskReducer`]; a presentation layer sends
//! [`TaskAction`]s through a [`Store`](tasklist_runtime::Store) and renders
//! from [`TaskState`] and its derived queries.
//!
//! # Quick Start
//!
//! ```no_run
//! use task_store::{Filter, TaskAction, TaskEnvironment, TaskReducer, TaskState};
//! use tasklist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new(TaskState::new(), TaskReducer::new(), TaskEnvironment::system());
//!
//! store.send(TaskAction::AddTask { text: "Buy milk".to_string() }).await?;
//! store.send(TaskAction::SetFilter { filter: Filter::Active }).await?;
//!
//! let stats = store.state(TaskState::stats).await;
//! println!("{} of {} pending", stats.pending, stats.total);
//! # Ok(())
//! # }
//! ```
//!
//! A store that starts from seeded tasks should build its environment with
//! [`TaskEnvironment::for_state`] so new ids continue after the seeds.

pub mod query;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use query::Stats;
pub use reducer::{TaskEnvironment, TaskReducer};
pub use types::{
    validate_text, Filter, ParseFilterError, Task, TaskAction, TaskError, TaskId, TaskState,
    MAX_TEXT_CHARS,
};

/// Store type for the task list
pub type TaskStore = tasklist_runtime::Store<TaskState, TaskAction, TaskEnvironment, TaskReducer>;
