//! Domain types for the task list.
//!
//! A task list is an ordered collection of short text tasks plus the
//! selection state the view needs: which filter is active and which task,
//! if any, is being edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tasklist_macros::Action;
use thiserror::Error;

/// Maximum number of characters in a task's text, counted after trimming
pub const MAX_TEXT_CHARS: usize = 100;

/// Unique identifier for a task
///
/// Identifiers are handed out by the environment's id generator and are
/// never reused, even after the task they named is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a task text is refused
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TaskError {
    /// Nothing left after trimming whitespace
    #[error("Please enter a task")]
    Empty,

    /// More than [`MAX_TEXT_CHARS`] characters after trimming
    #[error("Task is too long (max 100 characters)")]
    TooLong {
        /// Character count of the trimmed text
        len: usize,
    },

    /// Two seeded tasks share an identifier
    #[error("duplicate task id {id}")]
    DuplicateId {
        /// The repeated identifier
        id: TaskId,
    },

    /// Every identifier has already been handed out
    #[error("No task ids left")]
    IdsExhausted,
}

/// Trims `raw` and checks it against the text rules
///
/// Length is measured in Unicode scalar values, not bytes.
///
/// # Errors
///
/// Returns [`TaskError::Empty`] when nothing remains after trimming and
/// [`TaskError::TooLong`] when more than [`MAX_TEXT_CHARS`] characters remain.
///
/// # Example
///
/// ```
/// use task_store::{validate_text, TaskError};
///
/// assert_eq!(validate_text("  Buy milk \n"), Ok("Buy milk"));
/// assert_eq!(validate_text("   "), Err(TaskError::Empty));
/// ```
pub fn validate_text(raw: &str) -> Result<&str, TaskError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(TaskError::Empty);
    }
    if len > MAX_TEXT_CHARS {
        return Err(TaskError::TooLong { len });
    }
    Ok(trimmed)
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Trimmed text, 1 to 100 characters
    pub text: String,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task
    #[must_use]
    pub const fn new(id: TaskId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Same task, marked completed
    #[must_use]
    pub const fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// View restriction applied to the task list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `task` is visible under this filter
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known filter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown filter: {0}")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// State of the task list
///
/// Fields are public for reading; inside a `Store` every change goes
/// through [`TaskAction`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    /// Tasks in insertion order
    pub tasks: Vec<Task>,
    /// Active view restriction
    pub filter: Filter,
    /// Task currently in edit mode, always one present in `tasks`
    pub editing_id: Option<TaskId>,
    /// Most recent validation failure, for the inline message
    pub last_error: Option<TaskError>,
    /// Largest id ever issued, including ids of deleted tasks
    #[serde(default)]
    pub max_issued_id: Option<TaskId>,
}

impl TaskState {
    /// Creates an empty task list
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            editing_id: None,
            last_error: None,
            max_issued_id: None,
        }
    }

    /// Creates a task list holding `tasks`, in the given order
    ///
    /// Each task's text is trimmed and validated.
    ///
    /// # Errors
    ///
    /// Returns the first text validation failure, or
    /// [`TaskError::DuplicateId`] if two tasks share an id.
    pub fn seeded(tasks: impl IntoIterator<Item = Task>) -> Result<Self, TaskError> {
        let mut state = Self::new();
        for mut task in tasks {
            if state.contains(task.id) {
                return Err(TaskError::DuplicateId { id: task.id });
            }
            task.text = validate_text(&task.text)?.to_owned();
            state.tasks.push(task);
        }
        state.max_issued_id = state.max_id();
        Ok(state)
    }

    /// Largest id present, if any
    #[must_use]
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.iter().map(|t| t.id).max()
    }

    /// Ids at or below this value must never be issued again
    ///
    /// Covers deleted tasks through `max_issued_id` and hand-built states
    /// through the ids present.
    #[must_use]
    pub fn id_high_water(&self) -> Option<TaskId> {
        self.max_issued_id.max(self.max_id())
    }
}

/// Actions representing commands and events for the task list
///
/// Commands carry raw user input and are validated by the reducer. Events
/// record what was accepted and are applied to state without further
/// checks, so they can also be replayed directly.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    // ========== Commands ==========
    /// Command: Add a task from raw input
    #[command]
    AddTask {
        /// Untrimmed text as typed
        text: String,
    },

    /// Command: Flip a task's completion flag
    #[command]
    ToggleTask {
        /// Task to toggle
        id: TaskId,
    },

    /// Command: Remove a task
    ///
    /// Callers confirm with the user before sending this.
    #[command]
    DeleteTask {
        /// Task to delete
        id: TaskId,
    },

    /// Command: Put a pending task into edit mode
    #[command]
    BeginEdit {
        /// Task to edit
        id: TaskId,
    },

    /// Command: Commit an edit
    #[command]
    SaveEdit {
        /// Task being edited
        id: TaskId,
        /// Untrimmed replacement text
        text: String,
    },

    /// Command: Leave edit mode without changes
    #[command]
    CancelEdit,

    /// Command: Change the view restriction
    #[command]
    SetFilter {
        /// New filter
        filter: Filter,
    },

    /// Command: Clear the inline validation message
    #[command]
    DismissError,

    // ========== Events ==========
    /// Event: Task was appended
    #[event]
    TaskAdded {
        /// Fresh identifier
        id: TaskId,
        /// Trimmed text
        text: String,
        /// Creation time
        created_at: DateTime<Utc>,
    },

    /// Event: Task completion changed
    #[event]
    TaskToggled {
        /// Task identifier
        id: TaskId,
        /// Completion flag after the toggle
        completed: bool,
    },

    /// Event: Task was removed
    #[event]
    TaskDeleted {
        /// Task identifier
        id: TaskId,
    },

    /// Event: Task entered edit mode
    #[event]
    EditStarted {
        /// Task identifier
        id: TaskId,
    },

    /// Event: Task text was replaced
    #[event]
    TaskRenamed {
        /// Task identifier
        id: TaskId,
        /// Trimmed new text
        text: String,
    },

    /// Event: Edit mode was left
    #[event]
    EditCancelled,

    /// Event: View restriction changed
    #[event]
    FilterChanged {
        /// New filter
        filter: Filter,
    },

    /// Event: Input was refused
    #[event]
    ValidationFailed {
        /// Why it was refused
        error: TaskError,
    },

    /// Event: Inline validation message was cleared
    #[event]
    ErrorDismissed,
}
