//! Scripted demo of the task list.
//!
//! Plays the part of the presentation layer: seeds the list, sends the
//! actions a user would trigger, and prints what a view would render.
//! Set `RUST_LOG=debug` to see every accepted and ignored command.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use task_store::{
    Filter, Task, TaskAction, TaskEnvironment, TaskId, TaskReducer, TaskState, TaskStore,
};
use tasklist_core::environment::{Clock, SystemClock};
use tasklist_runtime::StoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Task List Demo ===\n");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let initial = sample_tasks(clock.now())?;
    let env = TaskEnvironment::for_state(&initial, Arc::clone(&clock));
    let store = TaskStore::with_config(initial, TaskReducer::new(), env, StoreConfig::default());

    render(&store).await;

    println!("Adding 'Buy milk'...");
    submit(&store, "Buy milk").await?;

    println!("Adding an empty task...");
    submit(&store, "   ").await?;

    println!("Adding a task that is too long...");
    submit(&store, &"x".repeat(101)).await?;

    let milk = store
        .state(|s| s.tasks.last().map(|t| t.id))
        .await
        .unwrap_or(TaskId::new(0));

    println!("Completing 'Buy milk'...");
    store.send(TaskAction::ToggleTask { id: milk }).await?;

    println!("Trying to edit a completed task...");
    store.send(TaskAction::BeginEdit { id: milk }).await?;
    let editing = store.state(|s| s.editing_id).await;
    println!("  editing: {editing:?}");

    println!("Renaming the first task...");
    let first = TaskId::new(1);
    store.send(TaskAction::BeginEdit { id: first }).await?;
    store
        .send(TaskAction::SaveEdit {
            id: first,
            text: "Finish the task store in Rust".to_string(),
        })
        .await?;

    println!("Showing active tasks only...");
    store
        .send(TaskAction::SetFilter {
            filter: Filter::Active,
        })
        .await?;
    render(&store).await;

    println!("Deleting 'Buy milk'...");
    if confirm_delete(milk) {
        store.send(TaskAction::DeleteTask { id: milk }).await?;
    }

    store
        .send(TaskAction::SetFilter { filter: Filter::All })
        .await?;
    render(&store).await;

    let snapshot = store.state(Clone::clone).await;
    println!("Snapshot:\n{}", serde_json::to_string_pretty(&snapshot)?);

    store.shutdown().await;
    println!("\n=== Demo Complete ===");
    Ok(())
}

/// The list the application starts with
fn sample_tasks(now: DateTime<Utc>) -> anyhow::Result<TaskState> {
    let state = TaskState::seeded([
        Task::new(
            TaskId::new(1),
            "Complete React assignment with Tailwind".to_string(),
            now,
        ),
        Task::new(
            TaskId::new(2),
            "Study React hooks and state management".to_string(),
            now,
        ),
        Task::new(TaskId::new(3), "Set up GitHub repository".to_string(), now).completed(),
    ])?;
    Ok(state)
}

/// Sends an add and reports the validation outcome like an inline form message
async fn submit(store: &TaskStore, text: &str) -> anyhow::Result<()> {
    store.send(TaskAction::DismissError).await?;
    store
        .send(TaskAction::AddTask {
            text: text.to_string(),
        })
        .await?;
    match store.state(|s| s.last_error.clone()).await {
        Some(error) => println!("  rejected: {error}"),
        None => println!("  added"),
    }
    Ok(())
}

/// Stand-in for the confirmation dialog; a real view would ask the user
fn confirm_delete(id: TaskId) -> bool {
    println!("  Are you sure you want to delete task {id}? yes");
    true
}

async fn render(store: &TaskStore) {
    let view = store.state(render_state).await;
    println!("{view}");
}

fn render_state(state: &TaskState) -> String {
    let stats = state.stats();
    let mut out = format!(
        "\n  Total: {}  Completed: {}  Pending: {}\n",
        stats.total, stats.completed, stats.pending
    );

    let badges: Vec<String> = Filter::ALL
        .iter()
        .map(|f| {
            let marker = if *f == state.filter { "*" } else { " " };
            format!("{marker}{f} ({})", state.count_for(*f))
        })
        .collect();
    out.push_str(&format!("  {}\n", badges.join("  ")));

    let visible: Vec<&Task> = state.filtered_view().collect();
    if visible.is_empty() {
        let message = match state.filter {
            Filter::All => "No tasks yet",
            Filter::Active => "No active tasks",
            Filter::Completed => "No completed tasks",
        };
        out.push_str(&format!("  {message}\n"));
    }
    for (index, task) in visible.iter().enumerate() {
        let status = if task.completed { "✓" } else { " " };
        out.push_str(&format!(
            "  {}. [{status}] {}  (created {})\n",
            index + 1,
            task.text,
            task.created_at.format("%b %e, %H:%M")
        ));
    }
    out
}
