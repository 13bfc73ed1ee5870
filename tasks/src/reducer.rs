//! Reducer logic for the task list.
//!
//! Commands are validated against the current state and turned into
//! events; events are applied to state by [`TaskReducer::apply_event`].
//! Events sent directly are checked against the same invariants before
//! they are applied. Unknown ids and edits of completed tasks are silent
//! no-ops. Only text validation failures are recorded, in `last_error`.

use crate::types::{validate_text, Task, TaskAction, TaskError, TaskId, TaskState};
use std::sync::Arc;
use tasklist_core::{
    environment::{Clock, IdGenerator, MonotonicIds, SystemClock},
    reducer::Reducer,
};

/// Environment dependencies for the task reducer
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of task identifiers
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Environment whose ids start after every id `state` has issued
    ///
    /// Use this for seeded or restored states.
    #[must_use]
    pub fn for_state(state: &TaskState, clock: Arc<dyn Clock>) -> Self {
        // At u64::MAX the reducer reports `IdsExhausted` on the next add
        let first = state
            .id_high_water()
            .map_or(Some(1), |id| id.get().checked_add(1))
            .unwrap_or(u64::MAX);
        Self::new(clock, Arc::new(MonotonicIds::starting_at(first)))
    }

    /// System clock and ids counting from 1
    ///
    /// Suited to an empty initial state. With a seeded state the reducer
    /// still never reissues an id, but ids jump past the seeds on the first
    /// add; [`TaskEnvironment::for_state`] continues right after them.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(MonotonicIds::new()))
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskReducer;

impl TaskReducer {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Draws an id above every id `state` has issued
    ///
    /// A generator that has fallen behind (for example one counting from 1
    /// over a seeded state) is overridden with the next id past the high
    /// water mark. Returns `None` once `u64` ids are used up.
    fn fresh_id(state: &TaskState, env: &TaskEnvironment) -> Option<TaskId> {
        let drawn = TaskId::new(env.ids.next_id());
        match state.id_high_water() {
            Some(high) if drawn <= high => {
                tracing::warn!(%drawn, %high, "Id generator is behind issued ids, skipping ahead");
                high.get().checked_add(1).map(TaskId::new)
            },
            _ => Some(drawn),
        }
    }

    /// Validates a command and returns the event it produces, if any
    fn decide(state: &TaskState, action: TaskAction, env: &TaskEnvironment) -> Option<TaskAction> {
        match action {
            TaskAction::AddTask { text } => Some(match validate_text(&text) {
                Ok(text) => match Self::fresh_id(state, env) {
                    Some(id) => TaskAction::TaskAdded {
                        id,
                        text: text.to_owned(),
                        created_at: env.clock.now(),
                    },
                    None => TaskAction::ValidationFailed {
                        error: TaskError::IdsExhausted,
                    },
                },
                Err(error) => TaskAction::ValidationFailed { error },
            }),

            TaskAction::ToggleTask { id } => {
                let Some(task) = state.get(id) else {
                    tracing::debug!(%id, "Toggle ignored: task not found");
                    return None;
                };
                Some(TaskAction::TaskToggled {
                    id,
                    completed: !task.completed,
                })
            },

            TaskAction::DeleteTask { id } => {
                if !state.contains(id) {
                    tracing::debug!(%id, "Delete ignored: task not found");
                    return None;
                }
                Some(TaskAction::TaskDeleted { id })
            },

            TaskAction::BeginEdit { id } => match state.get(id) {
                None => {
                    tracing::debug!(%id, "Edit ignored: task not found");
                    None
                },
                Some(task) if task.completed => {
                    tracing::debug!(%id, "Edit ignored: completed tasks are not editable");
                    None
                },
                Some(_) => Some(TaskAction::EditStarted { id }),
            },

            TaskAction::SaveEdit { id, text } => {
                let Some(task) = state.get(id) else {
                    tracing::debug!(%id, "Save ignored: task not found");
                    return None;
                };
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed == task.text {
                    return Some(TaskAction::EditCancelled);
                }
                Some(match validate_text(trimmed) {
                    Ok(text) => TaskAction::TaskRenamed {
                        id,
                        text: text.to_owned(),
                    },
                    Err(error) => TaskAction::ValidationFailed { error },
                })
            },

            TaskAction::CancelEdit => Some(TaskAction::EditCancelled),

            TaskAction::SetFilter { filter } => Some(TaskAction::FilterChanged { filter }),

            TaskAction::DismissError => Some(TaskAction::ErrorDismissed),

            // Events are checked by `apply_event`
            event => Some(event),
        }
    }

    /// Why `event` cannot be applied to `state`, if it cannot
    fn refusal(state: &TaskState, event: &TaskAction) -> Option<&'static str> {
        let valid_text = |text: &str| validate_text(text) == Ok(text);
        match event {
            TaskAction::TaskAdded { id, text, .. } => {
                if state.id_high_water().is_some_and(|high| *id <= high) {
                    Some("id already issued")
                } else if !valid_text(text) {
                    Some("invalid text")
                } else {
                    None
                }
            },
            TaskAction::TaskToggled { id, .. } | TaskAction::TaskDeleted { id } => {
                (!state.contains(*id)).then_some("task not found")
            },
            TaskAction::EditStarted { id } => match state.get(*id) {
                None => Some("task not found"),
                Some(task) if task.completed => Some("completed tasks are not editable"),
                Some(_) => None,
            },
            TaskAction::TaskRenamed { id, text } => {
                if !state.contains(*id) {
                    Some("task not found")
                } else if !valid_text(text) {
                    Some("invalid text")
                } else {
                    None
                }
            },
            _ => None,
        }
    }

    /// Applies an event to state
    ///
    /// Events that would break a state invariant are refused and leave
    /// state untouched: a `TaskAdded` reusing an issued id or carrying
    /// invalid text, an `EditStarted` for a completed task, or any event
    /// naming a task that is gone. Returns whether the event was applied.
    pub fn apply_event(state: &mut TaskState, event: &TaskAction) -> bool {
        if let Some(reason) = Self::refusal(state, event) {
            tracing::warn!(event = event.name(), reason, "Event refused");
            return false;
        }

        match event {
            TaskAction::TaskAdded {
                id,
                text,
                created_at,
            } => {
                state
                    .tasks
                    .push(Task::new(*id, text.clone(), *created_at));
                state.max_issued_id = Some(*id);
                state.last_error = None;
            },
            TaskAction::TaskToggled { id, completed } => {
                if let Some(task) = state.tasks.iter_mut().find(|t| t.id == *id) {
                    task.completed = *completed;
                }
            },
            TaskAction::TaskDeleted { id } => {
                state.tasks.retain(|t| t.id != *id);
                if state.editing_id == Some(*id) {
                    state.editing_id = None;
                }
            },
            TaskAction::EditStarted { id } => {
                state.editing_id = Some(*id);
            },
            TaskAction::TaskRenamed { id, text } => {
                if let Some(task) = state.tasks.iter_mut().find(|t| t.id == *id) {
                    task.text.clone_from(text);
                }
                state.last_error = None;
                if state.editing_id == Some(*id) {
                    state.editing_id = None;
                }
            },
            TaskAction::EditCancelled => {
                state.editing_id = None;
            },
            TaskAction::FilterChanged { filter } => {
                state.filter = *filter;
            },
            TaskAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            TaskAction::ErrorDismissed => {
                state.last_error = None;
            },
            // Commands are not applied to state
            TaskAction::AddTask { .. }
            | TaskAction::ToggleTask { .. }
            | TaskAction::DeleteTask { .. }
            | TaskAction::BeginEdit { .. }
            | TaskAction::SaveEdit { .. }
            | TaskAction::CancelEdit
            | TaskAction::SetFilter { .. }
            | TaskAction::DismissError => {},
        }
        true
    }

    fn log_event(command: &'static str, event: &TaskAction) {
        match event {
            TaskAction::ValidationFailed { error } => {
                tracing::info!(command, %error, "Input rejected");
            },
            TaskAction::TaskAdded { id, .. } => {
                tracing::debug!(command, %id, "Task added");
            },
            other => {
                tracing::debug!(command, event = other.name(), "Applied");
            },
        }
    }
}

impl Reducer for TaskReducer {
    type State = TaskState;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        let command = action.name();
        if let Some(event) = Self::decide(state, action, env) {
            if Self::apply_event(state, &event) {
                Self::log_event(command, &event);
            }
        }
    }
}
