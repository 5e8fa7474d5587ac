//! The tasks store: CRUD, the move/reindex operation, and board views.
//!
//! # Column invariant
//!
//! Within one (project, status) column, `order` values are exactly `1..=n`,
//! no duplicates, no gaps. Every mutation that disturbs a column rewrites
//! the orders of the affected tasks:
//!
//! - add appends at `max + 1`;
//! - move reindexes the target column and, on a status change, the column
//!   left behind;
//! - remove reindexes the survivors.

use serde::Serialize;

use crate::backend::Backend;
use crate::error::{PlankError, Result};
use crate::model::{Task, TaskCreate, TaskDraft, TaskPatch, TaskStatus};
use crate::store::{trimmed_optional, trimmed_required};

/// In-memory task collection over a backend, scoped to whatever project
/// was last refreshed.
#[derive(Debug)]
pub struct TasksStore {
    backend: Backend,
    tasks: Vec<Task>,
}

impl TasksStore {
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
        }
    }

    /// The backend this store persists through.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Replace in-memory state with one project's tasks.
    pub fn refresh(&mut self, project_id: &str) -> Result<()> {
        self.tasks = self.backend.list_tasks(project_id)?;
        tracing::debug!(project_id, count = self.tasks.len(), "tasks refreshed");
        Ok(())
    }

    /// The raw in-memory collection.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task in the in-memory collection.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// One project's tasks, sorted by column then position.
    #[must_use]
    pub fn for_project(&self, project_id: &str) -> Vec<&Task> {
        let mut out: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect();
        out.sort_by(|a, b| {
            column_rank(a.status)
                .cmp(&column_rank(b.status))
                .then_with(|| a.order.cmp(&b.order))
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    /// The grouped per-status view of one project's board.
    #[must_use]
    pub fn board(&self, project_id: &str) -> Board {
        let mut board = Board::default();
        for task in &self.tasks {
            if task.project_id != project_id {
                continue;
            }
            match task.status {
                TaskStatus::Todo => board.todo.push(task.clone()),
                TaskStatus::InProgress => board.in_progress.push(task.clone()),
                TaskStatus::Done => board.done.push(task.clone()),
            }
        }
        for column in [&mut board.todo, &mut board.in_progress, &mut board.done] {
            column.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        }
        board
    }

    /// Create a task at the end of its column.
    pub fn add(&mut self, project_id: &str, draft: TaskDraft) -> Result<Task> {
        let title = trimmed_required(&draft.title, "title")?;
        let create = TaskCreate {
            project_id: project_id.to_string(),
            title,
            assignee: trimmed_optional(draft.assignee.as_deref()),
            status: draft.status,
            due_date: draft.due_date,
            order: self.next_order(project_id, draft.status),
        };

        let created = self.backend.create_task(&create)?;
        tracing::info!(id = %created.id, project_id, status = %created.status, "task created");
        self.tasks.push(created.clone());
        Ok(created)
    }

    /// Apply a patch. Plain fields are written directly; a status or order
    /// change is routed through [`Self::move_task`] so the column invariant
    /// holds (a bare status change lands at the end of the target column).
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let current = self
            .get(id)
            .cloned()
            .ok_or_else(|| PlankError::TaskNotFound { id: id.to_string() })?;

        let mut patch = patch;
        if let Some(raw) = patch.title.take() {
            patch.title = Some(trimmed_required(&raw, "title")?);
        }

        let mut result = current.clone();
        let fields = patch.fields_only();
        if fields.has_field_changes() {
            let updated = self.backend.update_task(id, &fields)?;
            if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == id) {
                *entry = updated.clone();
            }
            result = updated;
        }

        let status_target = patch.status.filter(|s| *s != current.status);
        match (status_target, patch.order) {
            (None, None) => Ok(result),
            (None, Some(position)) if position == current.order => Ok(result),
            (None, Some(position)) => self.move_task(id, current.status, Some(position)),
            (Some(status), position) => self.move_task(id, status, position),
        }
    }

    /// Move a task to a status column and position (1-based; `None` or
    /// past-the-end clamps to the end of the column), then reindex both
    /// disturbed columns.
    pub fn move_task(
        &mut self,
        id: &str,
        new_status: TaskStatus,
        position: Option<u32>,
    ) -> Result<Task> {
        if position == Some(0) {
            return Err(PlankError::InvalidOrderTarget { position: 0 });
        }
        let task = self
            .get(id)
            .cloned()
            .ok_or_else(|| PlankError::TaskNotFound { id: id.to_string() })?;
        let project_id = task.project_id.clone();
        let old_status = task.status;

        let mut target = self.column_ids(&project_id, new_status, Some(id));
        let end = target.len();
        let index = position.map_or(end, |p| {
            usize::try_from(p - 1).unwrap_or(usize::MAX).min(end)
        });
        target.insert(index, id.to_string());

        let mut changes: Vec<(String, TaskPatch)> = Vec::new();
        for (i, task_id) in target.iter().enumerate() {
            let desired = order_at(i);
            let Some(entry) = self.get(task_id) else {
                continue;
            };
            if task_id.as_str() == id {
                let status_changed = entry.status != new_status;
                if status_changed || entry.order != desired {
                    changes.push((
                        task_id.clone(),
                        TaskPatch {
                            status: status_changed.then_some(new_status),
                            order: Some(desired),
                            ..TaskPatch::default()
                        },
                    ));
                }
            } else if entry.order != desired {
                changes.push((task_id.clone(), TaskPatch::order_only(desired)));
            }
        }

        if old_status != new_status {
            for (i, task_id) in self
                .column_ids(&project_id, old_status, Some(id))
                .iter()
                .enumerate()
            {
                let desired = order_at(i);
                let stale = self.get(task_id).is_some_and(|t| t.order != desired);
                if stale {
                    changes.push((task_id.clone(), TaskPatch::order_only(desired)));
                }
            }
        }

        if changes.is_empty() {
            tracing::debug!(id, "move is a no-op");
            return Ok(task);
        }

        let mut moved = task;
        for (task_id, patch) in &changes {
            let updated = self.backend.update_task(task_id, patch)?;
            if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == *task_id) {
                *entry = updated.clone();
            }
            if task_id.as_str() == id {
                moved = updated;
            }
        }

        tracing::info!(
            id,
            status = %moved.status,
            order = moved.order,
            rewritten = changes.len(),
            "task moved"
        );
        Ok(moved)
    }

    /// Delete a task and close the gap it leaves in its column.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let task = self
            .get(id)
            .cloned()
            .ok_or_else(|| PlankError::TaskNotFound { id: id.to_string() })?;

        self.backend.delete_task(id)?;
        self.tasks.retain(|t| t.id != id);
        tracing::info!(id, "task removed");

        self.reindex_column(&task.project_id, task.status)
    }

    fn reindex_column(&mut self, project_id: &str, status: TaskStatus) -> Result<()> {
        let ids = self.column_ids(project_id, status, None);
        for (i, task_id) in ids.iter().enumerate() {
            let desired = order_at(i);
            let stale = self.get(task_id).is_some_and(|t| t.order != desired);
            if stale {
                let updated = self
                    .backend
                    .update_task(task_id, &TaskPatch::order_only(desired))?;
                if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == *task_id) {
                    *entry = updated;
                }
            }
        }
        Ok(())
    }

    /// Ids of one column, sorted by position (id as tiebreaker for data
    /// that arrives with duplicate orders).
    fn column_ids(
        &self,
        project_id: &str,
        status: TaskStatus,
        exclude: Option<&str>,
    ) -> Vec<String> {
        let mut column: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.in_column(project_id, status))
            .filter(|t| exclude != Some(t.id.as_str()))
            .collect();
        column.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        column.into_iter().map(|t| t.id.clone()).collect()
    }

    fn next_order(&self, project_id: &str, status: TaskStatus) -> u32 {
        self.tasks
            .iter()
            .filter(|t| t.in_column(project_id, status))
            .map(|t| t.order)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// One project's tasks grouped into the three status columns, each sorted
/// by position.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Board {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl Board {
    /// The tasks of one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn total(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` if no column holds any task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

const fn column_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Done => 2,
    }
}

fn order_at(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
