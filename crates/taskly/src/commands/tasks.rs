//! Task command handlers.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tabled::Tabled;
use taskly_core::{CollectionStore, CommitOutcome, DeleteOutcome, StoreConsumer, Task, TaskId};
use tracing::debug;

use crate::cli::{EditArgs, GlobalOpts, ListArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

/// Refresh period for `list --watch` when nothing is configured.
const DEFAULT_WATCH_INTERVAL_SECS: u64 = 5;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl TaskRow {
    fn new(task: &Task, color: bool) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            status: output::status_label(task.is_completed, color),
            description: task.description_text().unwrap_or_default().to_owned(),
            updated: task.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn detail(task: &Task, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", task.id);
    let _ = writeln!(out, "Title:       {}", task.title);
    let _ = writeln!(out, "Status:      {}", output::status_label(task.is_completed, color));
    let _ = writeln!(
        out,
        "Description: {}",
        task.description_text().unwrap_or("(none)")
    );
    let _ = writeln!(out, "Created:     {}", task.created_at.to_rfc3339());
    let _ = write!(out, "Updated:     {}", task.updated_at.to_rfc3339());
    out
}

fn print_task(task: &Task, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        task,
        |t| detail(t, color),
        |t| t.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_snapshot(snapshot: &[Arc<Task>], global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        snapshot,
        |t| TaskRow::new(t, color),
        |t| t.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(
    store: &CollectionStore,
    consumer: &StoreConsumer,
    args: ListArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::load(consumer).await?;
    print_snapshot(&consumer.snapshot(), global)?;

    if !args.watch {
        return Ok(());
    }

    let interval = args
        .interval
        .or(Some(resolved.store.refresh_interval_secs).filter(|s| *s > 0))
        .unwrap_or(DEFAULT_WATCH_INTERVAL_SECS)
        .max(1);
    debug!(interval, profile = %resolved.profile_name, "watching task collection");

    let mut changes = consumer.subscribe();
    let mut errors = consumer.subscribe_refresh_errors();
    store.start_auto_refresh(Duration::from_secs(interval)).await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            snapshot = changes.changed() => {
                let Some(snapshot) = snapshot else { break };
                if !global.quiet {
                    eprintln!("── {} ──", chrono::Local::now().format("%H:%M:%S"));
                }
                print_snapshot(&snapshot, global)?;
            }
            Ok(err) = errors.recv() => {
                if !global.quiet {
                    eprintln!("refresh failed: {err}");
                }
            }
        }
    }

    Ok(())
}

pub async fn show(consumer: &StoreConsumer, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(consumer).await?;
    let id = TaskId::from(id);
    let task = consumer
        .record(&id)
        .ok_or_else(|| CliError::NotFound { id: id.to_string() })?;
    print_task(&task, global)
}

pub async fn add(
    consumer: &StoreConsumer,
    title: &str,
    description: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let created = consumer
        .add_record(title.trim(), util::trimmed(description))
        .await?;
    if !global.quiet {
        eprintln!("Task created");
    }
    print_task(&created, global)
}

pub async fn edit(consumer: &StoreConsumer, args: EditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.title.is_none() && args.description.is_none() && !args.clear_description {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change; pass --title, --description or --clear-description".into(),
        });
    }

    util::load(consumer).await?;
    let mut buffer = consumer.edit(&TaskId::from(args.id.as_str()))?;

    if let Some(title) = args.title {
        buffer.set_title(title)?;
    }
    if let Some(description) = args.description {
        buffer.set_description(Some(description))?;
    }
    if args.clear_description {
        buffer.set_description(None)?;
    }

    match buffer.commit().await? {
        CommitOutcome::Unchanged => {
            if !global.quiet {
                eprintln!("Nothing changed");
            }
        }
        CommitOutcome::Saved(patch) => {
            debug!(?patch, "task updated");
            if !global.quiet {
                eprintln!("Task updated");
            }
        }
    }
    print_task(buffer.seed(), global)
}

pub async fn toggle(consumer: &StoreConsumer, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(consumer).await?;
    let mut buffer = consumer.edit(&TaskId::from(id))?;

    let done = buffer.toggle_status().await?;
    if !global.quiet {
        eprintln!("Task marked {}", if done { "done" } else { "open" });
    }
    print_task(buffer.seed(), global)
}

pub async fn delete(consumer: &StoreConsumer, id: &str, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(consumer).await?;
    let mut buffer = consumer.edit(&TaskId::from(id))?;

    let mut prompt: Result<bool, CliError> = Ok(false);
    let outcome = buffer
        .delete(|task| {
            prompt = util::confirm(&format!("Delete task '{}'?", task.title), "delete", global.yes);
            matches!(prompt, Ok(true))
        })
        .await;
    prompt?;

    match outcome {
        Ok(DeleteOutcome::Deleted) => {
            if !global.quiet {
                eprintln!("Task deleted");
            }
            Ok(())
        }
        Ok(DeleteOutcome::Cancelled) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
