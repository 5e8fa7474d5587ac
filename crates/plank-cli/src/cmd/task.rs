//! `pk task` — CRUD and column moves within one project's board.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::io::Write;

use plank_core::config::Config;
use plank_core::error::PlankError;
use plank_core::model::{Task, TaskDraft, TaskPatch};
use plank_core::store::TasksStore;

use crate::cmd::{backend, fail, parse_status};
use crate::output::{OutputMode, render, render_success};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(
        about = "Create a task in a project",
        after_help = "EXAMPLES:\n    # Add to the todo column\n    pk task add --project p-website \"Draft copy\"\n\n    # Straight into another column, assigned and dated\n    pk task add --project p-website \"Review\" --status in-progress --assignee mira --due 2026-03-01"
    )]
    Add(AddArgs),

    #[command(
        about = "List a project's tasks",
        after_help = "EXAMPLES:\n    # All columns\n    pk task list --project p-website\n\n    # One column\n    pk task list --project p-website --status done"
    )]
    List(ListArgs),

    #[command(
        about = "Update a task's fields",
        after_help = "EXAMPLES:\n    # Rename\n    pk task update t-1 --project p-website --title \"New title\"\n\n    # A bare status change lands at the end of the target column\n    pk task update t-1 --project p-website --status done"
    )]
    Update(UpdateArgs),

    #[command(
        about = "Move a task to a column position",
        after_help = "EXAMPLES:\n    # To the top of in-progress\n    pk task move t-1 --project p-website --status in-progress --to 1\n\n    # Reorder within the current column\n    pk task move t-1 --project p-website --to 3"
    )]
    Move(MoveArgs),

    #[command(
        about = "Delete a task",
        after_help = "EXAMPLES:\n    pk task rm t-1 --project p-website"
    )]
    Rm(RmArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Owning project id.
    #[arg(short, long)]
    pub project: String,

    /// Task title.
    pub title: String,

    /// Assignee name.
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Target column: todo, in-progress, done.
    #[arg(short, long, default_value = "todo")]
    pub status: String,

    /// Due date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub due: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owning project id.
    #[arg(short, long)]
    pub project: String,

    /// Only show one column: todo, in-progress, done.
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task id.
    pub id: String,

    /// Owning project id.
    #[arg(short, long)]
    pub project: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New assignee.
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// New column: todo, in-progress, done.
    #[arg(short, long)]
    pub status: Option<String>,

    /// New due date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub due: Option<NaiveDate>,

    /// New 1-based column position.
    #[arg(long, value_name = "POS")]
    pub order: Option<u32>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Task id.
    pub id: String,

    /// Owning project id.
    #[arg(short, long)]
    pub project: String,

    /// Target column (defaults to the task's current column).
    #[arg(short, long)]
    pub status: Option<String>,

    /// 1-based position in the target column (defaults to the end).
    #[arg(long, value_name = "POS")]
    pub to: Option<u32>,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Task id.
    pub id: String,

    /// Owning project id.
    #[arg(short, long)]
    pub project: String,
}

pub fn run(command: &TaskCommand, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    match command {
        TaskCommand::Add(args) => run_add(args, config, output),
        TaskCommand::List(args) => run_list(args, config, output),
        TaskCommand::Update(args) => run_update(args, config, output),
        TaskCommand::Move(args) => run_move(args, config, output),
        TaskCommand::Rm(args) => run_rm(args, config, output),
    }
}

/// Build a refreshed store so order computations see the current board.
fn refreshed_store(
    project_id: &str,
    config: &Config,
    output: OutputMode,
) -> anyhow::Result<TasksStore> {
    let mut store = TasksStore::new(backend(config, output)?);
    store.refresh(project_id).map_err(|err| fail(output, &err))?;
    Ok(store)
}

fn run_add(args: &AddArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let status = parse_status(&args.status, output)?;
    let mut store = refreshed_store(&args.project, config, output)?;

    let created = store
        .add(
            &args.project,
            TaskDraft {
                title: args.title.clone(),
                assignee: args.assignee.clone(),
                status,
                due_date: args.due,
            },
        )
        .map_err(|err| fail(output, &err))?;

    render(output, &created, |t, w| {
        writeln!(
            w,
            "✓ created task '{}' ({}) in {} at position {}",
            t.title, t.id, t.status, t.order
        )
    })
}

fn run_list(args: &ListArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let filter = match &args.status {
        Some(raw) => Some(parse_status(raw, output)?),
        None => None,
    };
    let store = refreshed_store(&args.project, config, output)?;

    let tasks: Vec<Task> = store
        .for_project(&args.project)
        .into_iter()
        .filter(|t| filter.is_none_or(|status| t.status == status))
        .cloned()
        .collect();

    render(output, &tasks, |list, w| {
        if list.is_empty() {
            return writeln!(w, "No tasks found.");
        }
        for t in list {
            write!(w, "{}  [{}] {}. {}", t.id, t.status, t.order, t.title)?;
            if let Some(assignee) = &t.assignee {
                write!(w, "  @{assignee}")?;
            }
            if let Some(due) = t.due_date {
                write!(w, "  due {due}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    })
}

fn run_update(args: &UpdateArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let status = match &args.status {
        Some(raw) => Some(parse_status(raw, output)?),
        None => None,
    };
    let mut store = refreshed_store(&args.project, config, output)?;

    let patch = TaskPatch {
        title: args.title.clone(),
        assignee: args.assignee.clone(),
        status,
        due_date: args.due,
        order: args.order,
    };
    let updated = store
        .update(&args.id, patch)
        .map_err(|err| fail(output, &err))?;

    render(output, &updated, |t, w| {
        writeln!(
            w,
            "✓ updated task '{}' ({}) — {} position {}",
            t.title, t.id, t.status, t.order
        )
    })
}

fn run_move(args: &MoveArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = refreshed_store(&args.project, config, output)?;

    let status = match &args.status {
        Some(raw) => parse_status(raw, output)?,
        None => {
            // Default to the task's current column: a bare --to reorders.
            store
                .get(&args.id)
                .map(|t| t.status)
                .ok_or_else(|| {
                    fail(
                        output,
                        &PlankError::TaskNotFound {
                            id: args.id.clone(),
                        },
                    )
                })?
        }
    };

    let moved = store
        .move_task(&args.id, status, args.to)
        .map_err(|err| fail(output, &err))?;

    render(output, &moved, |t, w| {
        writeln!(
            w,
            "✓ moved task '{}' ({}) to {} position {}",
            t.title, t.id, t.status, t.order
        )
    })
}

fn run_rm(args: &RmArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = refreshed_store(&args.project, config, output)?;
    store.remove(&args.id).map_err(|err| fail(output, &err))?;
    render_success(output, &format!("removed task {}", args.id))
}
