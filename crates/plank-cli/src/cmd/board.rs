//! `pk board` — the grouped per-status view of one project.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use plank_core::config::Config;
use plank_core::model::{Project, TaskStatus};
use plank_core::store::{Board, ProjectsStore, TasksStore};

use crate::cmd::{backend, fail};
use crate::output::{OutputMode, pretty_section, render};

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Project id.
    pub project: String,
}

/// JSON shape of `pk board --json`: the project plus its three columns.
#[derive(Debug, Serialize)]
struct BoardView {
    project: Project,
    board: Board,
}

pub fn run(args: &BoardArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let backend = backend(config, output)?;

    let projects = ProjectsStore::new(backend.clone());
    let project = projects
        .fetch_by_id(&args.project)
        .map_err(|err| fail(output, &err))?;

    let mut tasks = TasksStore::new(backend);
    tasks.refresh(&project.id).map_err(|err| fail(output, &err))?;
    let board = tasks.board(&project.id);

    let view = BoardView { project, board };
    render(output, &view, |v, w| {
        writeln!(w, "{} — {} tasks", v.project.name, v.board.total())?;
        writeln!(w)?;
        for status in TaskStatus::ALL {
            pretty_section(w, &status.to_string())?;
            let column = v.board.column(status);
            if column.is_empty() {
                writeln!(w, "  (empty)")?;
            }
            for t in column {
                write!(w, "  {}. {}", t.order, t.title)?;
                if let Some(assignee) = &t.assignee {
                    write!(w, "  @{assignee}")?;
                }
                if let Some(due) = t.due_date {
                    write!(w, "  due {due}")?;
                }
                writeln!(w)?;
            }
            writeln!(w)?;
        }
        Ok(())
    })
}
