//! The projects store: CRUD over the project collection.

use crate::backend::{Backend, project_draft};
use crate::error::Result;
use crate::model::{Project, ProjectPatch};
use crate::store::{trimmed_optional, trimmed_required};

/// In-memory project collection over a backend.
#[derive(Debug)]
pub struct ProjectsStore {
    backend: Backend,
    projects: Vec<Project>,
}

impl ProjectsStore {
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self {
            backend,
            projects: Vec::new(),
        }
    }

    /// The backend this store persists through.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Replace in-memory state with the backend's current collection.
    pub fn refresh(&mut self) -> Result<()> {
        self.projects = self.backend.list_projects()?;
        tracing::debug!(count = self.projects.len(), "projects refreshed");
        Ok(())
    }

    /// All projects, newest first (id as tiebreaker for equal timestamps).
    #[must_use]
    pub fn all(&self) -> Vec<&Project> {
        let mut sorted: Vec<&Project> = self.projects.iter().collect();
        sorted.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        sorted
    }

    /// Look up a project in the in-memory collection.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Fetch one project straight from the backend without touching state.
    pub fn fetch_by_id(&self, id: &str) -> Result<Project> {
        self.backend.get_project(id)
    }

    /// Create a project from trimmed user input and append it to state.
    pub fn add(&mut self, name: &str, description: Option<&str>) -> Result<Project> {
        let name = trimmed_required(name, "name")?;
        let draft = project_draft(name, trimmed_optional(description));

        let created = self.backend.create_project(&draft)?;
        tracing::info!(id = %created.id, name = %created.name, "project created");
        self.projects.push(created.clone());
        Ok(created)
    }

    /// Update name and/or description. An all-absent patch is a no-op that
    /// returns the stored project.
    pub fn update(
        &mut self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Project> {
        let patch = ProjectPatch {
            name: match name {
                Some(raw) => Some(trimmed_required(raw, "name")?),
                None => None,
            },
            description: trimmed_optional(description),
        };

        if patch.is_empty() {
            return self
                .get(id)
                .cloned()
                .map_or_else(|| self.backend.get_project(id), Ok);
        }

        let updated = self.backend.update_project(id, &patch)?;
        if let Some(existing) = self.projects.iter_mut().find(|p| p.id == id) {
            *existing = updated.clone();
        }
        tracing::info!(id = %updated.id, "project updated");
        Ok(updated)
    }

    /// Delete a project and drop it from state.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.backend.delete_project(id)?;
        self.projects.retain(|p| p.id != id);
        tracing::info!(id, "project removed");
        Ok(())
    }
}
