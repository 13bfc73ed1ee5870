//! Property-based tests for the task reducer.
//!
//! Uses proptest to verify:
//! 1. Adding succeeds exactly when the trimmed text has 1 to 100 characters.
//! 2. Toggling the same task twice restores the original state.
//! 3. Deleting is idempotent.
//! 4. Completed tasks never enter edit mode.
//! 5. Saving blank text behaves like cancelling.
//! 6. Any sequence of commands and directly sent events preserves the list
//!    invariants, and no id is ever issued twice.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use task_store::{
    validate_text, Filter, Task, TaskAction, TaskEnvironment, TaskId, TaskReducer, TaskState,
};
use tasklist_core::{environment::Clock, reducer::Reducer};
use tasklist_testing::{test_clock, ScriptedIds};

fn test_env() -> TaskEnvironment {
    TaskEnvironment::new(Arc::new(test_clock()), Arc::new(ScriptedIds::default()))
}

fn apply(state: &mut TaskState, actions: impl IntoIterator<Item = TaskAction>) {
    let env = test_env();
    apply_with(&env, state, actions);
}

fn apply_with(
    env: &TaskEnvironment,
    state: &mut TaskState,
    actions: impl IntoIterator<Item = TaskAction>,
) {
    let reducer = TaskReducer::new();
    for action in actions {
        reducer.reduce(state, action, env);
    }
}

// --- Strategies ---

/// Filters, uniformly
fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![Just(Filter::All), Just(Filter::Active), Just(Filter::Completed)]
}

/// Text as a user might type it: padding, blanks, and overlong input included
fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ \t]{0,3}[a-zA-Z0-9 ]{0,110}[ \t]{0,3}",
        "\\PC{0,120}",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

/// Task lists with ids 1..=n, random completion, filter and edit mode
fn arb_state() -> impl Strategy<Value = TaskState> {
    (
        prop::collection::vec(("[a-z]{1,20}", any::<bool>()), 0..8),
        arb_filter(),
        any::<prop::sample::Index>(),
        any::<bool>(),
    )
        .prop_map(|(entries, filter, pick, editing)| {
            let tasks: Vec<Task> = entries
                .into_iter()
                .enumerate()
                .map(|(i, (text, completed))| {
                    let task = Task::new(TaskId::new(i as u64 + 1), text, test_clock().now());
                    if completed { task.completed() } else { task }
                })
                .collect();
            let pending: Vec<TaskId> =
                tasks.iter().filter(|t| !t.completed).map(|t| t.id).collect();
            let editing_id = if editing && !pending.is_empty() {
                Some(pending[pick.index(pending.len())])
            } else {
                None
            };
            TaskState {
                tasks,
                filter,
                editing_id,
                ..TaskState::new()
            }
        })
}

/// Ids that may or may not name an existing task
fn arb_id() -> impl Strategy<Value = TaskId> {
    (0u64..10).prop_map(TaskId::new)
}

/// Any command a presentation layer can send
fn arb_command() -> impl Strategy<Value = TaskAction> {
    prop_oneof![
        arb_input().prop_map(|text| TaskAction::AddTask { text }),
        arb_id().prop_map(|id| TaskAction::ToggleTask { id }),
        arb_id().prop_map(|id| TaskAction::DeleteTask { id }),
        arb_id().prop_map(|id| TaskAction::BeginEdit { id }),
        (arb_id(), arb_input()).prop_map(|(id, text)| TaskAction::SaveEdit { id, text }),
        Just(TaskAction::CancelEdit),
        arb_filter().prop_map(|filter| TaskAction::SetFilter { filter }),
        Just(TaskAction::DismissError),
    ]
}

/// Events a caller might send directly instead of going through commands
fn arb_event() -> impl Strategy<Value = TaskAction> {
    prop_oneof![
        (arb_id(), arb_input()).prop_map(|(id, text)| TaskAction::TaskAdded {
            id,
            text,
            created_at: test_clock().now(),
        }),
        (arb_id(), any::<bool>()).prop_map(|(id, completed)| TaskAction::TaskToggled { id, completed }),
        arb_id().prop_map(|id| TaskAction::TaskDeleted { id }),
        arb_id().prop_map(|id| TaskAction::EditStarted { id }),
        (arb_id(), arb_input()).prop_map(|(id, text)| TaskAction::TaskRenamed { id, text }),
        Just(TaskAction::EditCancelled),
    ]
}

/// Mostly commands, with some raw events mixed in
fn arb_action() -> impl Strategy<Value = TaskAction> {
    prop_oneof![4 => arb_command(), 1 => arb_event()]
}

fn assert_invariants(state: &TaskState) -> Result<(), TestCaseError> {
    let ids: HashSet<TaskId> = state.tasks.iter().map(|t| t.id).collect();
    prop_assert_eq!(ids.len(), state.tasks.len(), "ids must be unique");

    for task in &state.tasks {
        prop_assert_eq!(validate_text(&task.text), Ok(task.text.as_str()));
    }

    if let Some(id) = state.editing_id {
        prop_assert!(state.contains(id), "editing id {} must name a present task", id);
    }

    let stats = state.stats();
    prop_assert_eq!(stats.total, state.tasks.len());
    prop_assert_eq!(stats.completed + stats.pending, stats.total);

    let active = state.count_for(Filter::Active);
    let completed = state.count_for(Filter::Completed);
    prop_assert_eq!(active + completed, state.count_for(Filter::All));
    prop_assert!(state.view(Filter::Active).all(|t| !t.completed));
    prop_assert!(state.view(Filter::Completed).all(|t| t.completed));
    Ok(())
}

proptest! {
    #[test]
    fn add_accepts_exactly_valid_text(initial in arb_state(), text in arb_input()) {
        let mut state = initial.clone();
        apply(&mut state, [TaskAction::AddTask { text: text.clone() }]);

        let len = text.trim().chars().count();
        if (1..=100).contains(&len) {
            prop_assert_eq!(state.tasks.len(), initial.tasks.len() + 1);
            let added = &state.tasks[state.tasks.len() - 1];
            prop_assert_eq!(added.text.as_str(), text.trim());
            prop_assert!(!added.completed);
            prop_assert!(state.last_error.is_none());
        } else {
            prop_assert_eq!(&state.tasks, &initial.tasks);
            prop_assert!(state.last_error.is_some());
        }
    }

    #[test]
    fn toggle_twice_is_identity(initial in arb_state(), id in arb_id()) {
        let mut state = initial.clone();
        apply(&mut state, [TaskAction::ToggleTask { id }, TaskAction::ToggleTask { id }]);
        prop_assert_eq!(state, initial);
    }

    #[test]
    fn delete_is_idempotent(initial in arb_state(), id in arb_id()) {
        let mut once = initial.clone();
        apply(&mut once, [TaskAction::DeleteTask { id }]);

        let mut twice = initial;
        apply(&mut twice, [TaskAction::DeleteTask { id }, TaskAction::DeleteTask { id }]);

        prop_assert!(!once.contains(id));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn completed_tasks_never_enter_edit_mode(initial in arb_state(), id in arb_id()) {
        let mut state = initial.clone();
        apply(&mut state, [TaskAction::BeginEdit { id }]);

        match initial.get(id) {
            Some(task) if !task.completed => prop_assert_eq!(state.editing_id, Some(id)),
            _ => prop_assert_eq!(state.editing_id, initial.editing_id),
        }
    }

    #[test]
    fn blank_save_is_cancel(initial in arb_state(), blank in "[ \t\n]{0,5}") {
        for task in &initial.tasks {
            let mut saved = initial.clone();
            apply(&mut saved, [TaskAction::SaveEdit { id: task.id, text: blank.clone() }]);

            let mut cancelled = initial.clone();
            apply(&mut cancelled, [TaskAction::CancelEdit]);

            prop_assert_eq!(saved, cancelled);
        }
    }

    #[test]
    fn action_sequences_preserve_invariants(
        initial in arb_state(),
        actions in prop::collection::vec(arb_action(), 0..40),
    ) {
        let env = test_env();
        let mut state = initial;
        let mut issued: HashSet<TaskId> = state.tasks.iter().map(|t| t.id).collect();
        assert_invariants(&state)?;

        for action in actions {
            let before: HashSet<TaskId> = state.tasks.iter().map(|t| t.id).collect();
            let was_editing = state.editing_id;
            let is_begin_edit = matches!(action, TaskAction::BeginEdit { .. } | TaskAction::EditStarted { .. });

            apply_with(&env, &mut state, [action]);
            assert_invariants(&state)?;

            for task in state.tasks.iter().filter(|t| !before.contains(&t.id)) {
                prop_assert!(issued.insert(task.id), "id {} was issued twice", task.id);
            }
            if is_begin_edit && state.editing_id != was_editing {
                prop_assert!(state.editing().is_some_and(|t| !t.completed));
            }
        }
    }
}
