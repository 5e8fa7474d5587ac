//! `pk project` — CRUD over the project collection.

use clap::{Args, Subcommand};
use std::io::Write;

use plank_core::config::Config;
use plank_core::model::Project;
use plank_core::store::ProjectsStore;

use crate::cmd::{backend, fail};
use crate::output::{OutputMode, pretty_kv, pretty_section, render, render_success};

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(
        about = "Create a new project",
        after_help = "EXAMPLES:\n    # Create a project\n    pk project add \"Website relaunch\"\n\n    # With a description\n    pk project add \"Website relaunch\" --description \"Spring launch\"\n\n    # Emit machine-readable output\n    pk project add \"Website relaunch\" --json"
    )]
    Add(AddArgs),

    #[command(
        about = "List projects",
        after_help = "EXAMPLES:\n    # List all projects, newest first\n    pk project list\n\n    # Emit machine-readable output\n    pk project list --json"
    )]
    List,

    #[command(
        about = "Show one project",
        after_help = "EXAMPLES:\n    pk project show p-website"
    )]
    Show(ShowArgs),

    #[command(
        about = "Update a project's name or description",
        after_help = "EXAMPLES:\n    pk project update p-website --name \"Website v2\""
    )]
    Update(UpdateArgs),

    #[command(
        about = "Delete a project and its tasks",
        after_help = "EXAMPLES:\n    pk project rm p-website"
    )]
    Rm(RmArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project name.
    pub name: String,

    /// Description text.
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Project id.
    pub id: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New description.
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Project id.
    pub id: String,
}

pub fn run(command: &ProjectCommand, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    match command {
        ProjectCommand::Add(args) => run_add(args, config, output),
        ProjectCommand::List => run_list(config, output),
        ProjectCommand::Show(args) => run_show(args, config, output),
        ProjectCommand::Update(args) => run_update(args, config, output),
        ProjectCommand::Rm(args) => run_rm(args, config, output),
    }
}

fn run_add(args: &AddArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = ProjectsStore::new(backend(config, output)?);
    let created = store
        .add(&args.name, args.description.as_deref())
        .map_err(|err| fail(output, &err))?;

    render(output, &created, |p, w| {
        writeln!(w, "✓ created project '{}' ({})", p.name, p.id)
    })
}

fn run_list(config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = ProjectsStore::new(backend(config, output)?);
    store.refresh().map_err(|err| fail(output, &err))?;

    let projects: Vec<Project> = store.all().into_iter().cloned().collect();
    render(output, &projects, |list, w| {
        if list.is_empty() {
            return writeln!(w, "No projects yet. Create one with `pk project add`.");
        }
        for p in list {
            writeln!(
                w,
                "{}  {}  {}",
                p.id,
                p.created_at.format("%Y-%m-%d"),
                p.name
            )?;
        }
        Ok(())
    })
}

fn run_show(args: &ShowArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let store = ProjectsStore::new(backend(config, output)?);
    let project = store
        .fetch_by_id(&args.id)
        .map_err(|err| fail(output, &err))?;

    render(output, &project, |p, w| {
        pretty_section(w, &p.name)?;
        pretty_kv(w, "id", &p.id)?;
        pretty_kv(w, "created", p.created_at.format("%Y-%m-%d %H:%M").to_string())?;
        if let Some(description) = &p.description {
            pretty_kv(w, "description", description)?;
        }
        Ok(())
    })
}

fn run_update(args: &UpdateArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = ProjectsStore::new(backend(config, output)?);
    let updated = store
        .update(&args.id, args.name.as_deref(), args.description.as_deref())
        .map_err(|err| fail(output, &err))?;

    render(output, &updated, |p, w| {
        writeln!(w, "✓ updated project '{}' ({})", p.name, p.id)
    })
}

fn run_rm(args: &RmArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut store = ProjectsStore::new(backend(config, output)?);
    store.remove(&args.id).map_err(|err| fail(output, &err))?;
    render_success(output, &format!("removed project {}", args.id))
}
