//! Command handlers. Each submodule owns the arg structs and the thin
//! wrapper mapping one subcommand onto one store call.

pub mod board;
pub mod project;
pub mod task;

use crate::output::{CliError, OutputMode, render_error};
use plank_core::backend::Backend;
use plank_core::config::Config;
use plank_core::error::PlankError;
use plank_core::model::TaskStatus;

/// Render a core error to stderr and convert it for the exit path.
pub(crate) fn fail(output: OutputMode, err: &PlankError) -> anyhow::Error {
    let _ = render_error(output, &CliError::from(err));
    anyhow::anyhow!("{err}")
}

/// Resolve the backend for one command invocation.
pub(crate) fn backend(config: &Config, output: OutputMode) -> anyhow::Result<Backend> {
    Backend::from_config(config).map_err(|err| fail(output, &err))
}

/// Parse a `--status` flag value with the CLI's error rendering.
pub(crate) fn parse_status(raw: &str, output: OutputMode) -> anyhow::Result<TaskStatus> {
    raw.parse::<TaskStatus>()
        .map_err(|err| fail(output, &PlankError::from(err)))
}
