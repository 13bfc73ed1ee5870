//! Derived queries over [`TaskState`]: lookups, filtered views and counts.
//!
//! Nothing here mutates state, so the presentation layer can render from
//! these without duplicating business rules.

use crate::types::{Filter, Task, TaskId, TaskState};
use serde::{Deserialize, Serialize};

/// Task counts
///
/// `completed + pending == total` holds for every state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of tasks
    pub total: usize,
    /// Number of completed tasks
    pub completed: usize,
    /// Number of tasks not yet completed
    pub pending: usize,
}

impl TaskState {
    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// The task currently in edit mode
    #[must_use]
    pub fn editing(&self) -> Option<&Task> {
        self.editing_id.and_then(|id| self.get(id))
    }

    /// Tasks visible under the active filter, in insertion order
    ///
    /// The iterator is `Clone`, so it can be walked more than once.
    pub fn filtered_view(&self) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.view(self.filter)
    }

    /// Tasks visible under `filter`, in insertion order
    pub fn view(&self, filter: Filter) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    /// Number of tasks visible under `filter`
    #[must_use]
    pub fn count_for(&self, filter: Filter) -> usize {
        self.view(filter).count()
    }

    /// Total, completed and pending counts
    #[must_use]
    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.count_for(Filter::Completed);
        Stats {
            total,
            completed,
            pending: total - completed,
        }
    }
}
