#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::OutputMode;
use plank_core::config::{self, Overrides};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "plank: offline-first kanban project/task tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the tracker API (overrides env and config file).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Directory for the local snapshot (overrides env and config file).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Work against the local snapshot even when an API is configured.
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.json)
    }

    /// Collect the config overrides carried by global flags.
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            data_dir: self.data_dir.clone(),
            local: self.local,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand, about = "Manage projects")]
    Project(cmd::project::ProjectCommand),

    #[command(subcommand, about = "Manage tasks on a project's board")]
    Task(cmd::task::TaskCommand),

    #[command(
        about = "Show a project's board grouped by status",
        after_help = "EXAMPLES:\n    # Render the three columns\n    pk board p-website\n\n    # Emit machine-readable output\n    pk board p-website --json"
    )]
    Board(cmd::board::BoardArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PLANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "plank=debug,info"
        } else {
            "plank=info,warn"
        })
    });

    let format = env::var("PLANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config = match config::resolve(&cli.overrides()) {
        Ok(config) => config,
        Err(err) => {
            let _ = output::render_error(output, &output::CliError::from(&err));
            anyhow::bail!("{err}");
        }
    };

    match &cli.command {
        Commands::Project(command) => cmd::project::run(command, &config, output),
        Commands::Task(command) => cmd::task::run(command, &config, output),
        Commands::Board(args) => cmd::board::run(args, &config, output),
    }
}
