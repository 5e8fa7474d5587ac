//! State containers over the backend seam.
//!
//! Stores hold the in-memory collections the UI reads, push every mutation
//! through the backend first, and only then update memory — a failed call
//! leaves the container as it was.

pub mod projects;
pub mod tasks;

pub use projects::ProjectsStore;
pub use tasks::{Board, TasksStore};

use crate::error::{PlankError, Result};

/// Trim a required text field, rejecting empty input.
pub(crate) fn trimmed_required(input: &str, field: &'static str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PlankError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, collapsing blank input to `None`.
pub(crate) fn trimmed_optional(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
