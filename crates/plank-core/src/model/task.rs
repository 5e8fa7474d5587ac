use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three kanban columns a task can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

/// Error returned when parsing a status value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub got: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status: '{}'", self.got)
    }
}

impl std::error::Error for ParseStatusError {}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" | "in_progress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError { got: s.to_string() }),
        }
    }
}

/// A single task as stored and exchanged with the API.
///
/// `order` is the 1-based position of the task within its (project, status)
/// column. Within one column, orders are contiguous starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub order: u32,
}

impl Task {
    /// Returns `true` if this task sits in the given project/status column.
    #[must_use]
    pub fn in_column(&self, project_id: &str, status: TaskStatus) -> bool {
        self.project_id == project_id && self.status == status
    }

    /// Apply the set fields of `patch` in place.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(assignee) = &patch.assignee {
            self.assignee = Some(assignee.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Caller-supplied fields for a new task. The store derives the rest
/// (owning project, column position).
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub assignee: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

/// Full wire body for `POST /tasks`. The server (or the local backend)
/// assigns the id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    pub project_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub order: u32,
}

/// Partial update body for `PATCH /tasks/{id}`. Absent fields are omitted
/// from the JSON body and left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl TaskPatch {
    /// A patch that only rewrites the column position.
    #[must_use]
    pub const fn order_only(order: u32) -> Self {
        Self {
            title: None,
            assignee: None,
            status: None,
            due_date: None,
            order: Some(order),
        }
    }

    /// Returns `true` if the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.assignee.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.order.is_none()
    }

    /// Returns `true` if the patch touches plain fields (anything other
    /// than status/order placement).
    #[must_use]
    pub const fn has_field_changes(&self) -> bool {
        self.title.is_some() || self.assignee.is_some() || self.due_date.is_some()
    }

    /// The patch with status and order stripped, for splitting a combined
    /// update into a field write and a move.
    #[must_use]
    pub fn fields_only(&self) -> Self {
        Self {
            title: self.title.clone(),
            assignee: self.assignee.clone(),
            status: None,
            due_date: self.due_date,
            order: None,
        }
    }
}
