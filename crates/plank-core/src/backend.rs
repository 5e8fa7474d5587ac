//! The request/response seam the stores talk to.
//!
//! A [`Backend`] is either the remote REST client or the local snapshot,
//! chosen once at construction: remote when an API URL is configured and a
//! probe answers, local otherwise. Both sides expose the same nine CRUD
//! operations; ordering semantics live above this seam, in the stores.

use chrono::Utc;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{PlankError, Result};
use crate::model::{Project, ProjectDraft, ProjectPatch, Task, TaskCreate, TaskPatch};
use crate::sample;
use crate::storage::{Snapshot, SnapshotStore};

/// Where store operations are persisted.
#[derive(Debug, Clone)]
pub enum Backend {
    Remote(ApiClient),
    Local(LocalBackend),
}

impl Backend {
    /// Resolve a backend from configuration.
    ///
    /// Remote wins when an API URL is configured, local mode is not forced,
    /// and the probe gets any HTTP answer. Everything else lands on the
    /// local snapshot (seeded with sample data on first use).
    pub fn from_config(config: &Config) -> Result<Self> {
        if !config.force_local {
            if let Some(url) = &config.api_url {
                let client = ApiClient::new(url);
                if client.probe() {
                    tracing::info!(url = client.base_url(), "using remote API");
                    return Ok(Self::Remote(client));
                }
                tracing::warn!(
                    url = client.base_url(),
                    "API unreachable, falling back to local snapshot"
                );
            }
        }

        let local = LocalBackend::open(SnapshotStore::new(&config.data_dir))?;
        Ok(Self::Local(local))
    }

    /// Returns `true` when backed by the remote API.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        match self {
            Self::Remote(api) => api.list_projects(),
            Self::Local(local) => local.list_projects(),
        }
    }

    pub fn get_project(&self, id: &str) -> Result<Project> {
        match self {
            Self::Remote(api) => api.get_project(id),
            Self::Local(local) => local.get_project(id),
        }
    }

    pub fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        match self {
            Self::Remote(api) => api.create_project(draft),
            Self::Local(local) => local.create_project(draft),
        }
    }

    pub fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        match self {
            Self::Remote(api) => api.update_project(id, patch),
            Self::Local(local) => local.update_project(id, patch),
        }
    }

    pub fn delete_project(&self, id: &str) -> Result<()> {
        match self {
            Self::Remote(api) => api.delete_project(id),
            Self::Local(local) => local.delete_project(id),
        }
    }

    pub fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        match self {
            Self::Remote(api) => api.list_tasks_by_project(project_id),
            Self::Local(local) => local.list_tasks(project_id),
        }
    }

    pub fn create_task(&self, create: &TaskCreate) -> Result<Task> {
        match self {
            Self::Remote(api) => api.create_task(create),
            Self::Local(local) => local.create_task(create),
        }
    }

    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        match self {
            Self::Remote(api) => api.update_task(id, patch),
            Self::Local(local) => local.update_task(id, patch),
        }
    }

    pub fn delete_task(&self, id: &str) -> Result<()> {
        match self {
            Self::Remote(api) => api.delete_task(id),
            Self::Local(local) => local.delete_task(id),
        }
    }
}

/// Snapshot-backed CRUD. Each operation is one read-modify-write cycle on
/// the snapshot file, so concurrent `pk` processes see each other's writes.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    store: SnapshotStore,
}

impl LocalBackend {
    /// Open the snapshot directory, seeding sample data if no snapshot
    /// exists yet.
    pub fn open(store: SnapshotStore) -> Result<Self> {
        if !store.exists() {
            let seed = sample::snapshot();
            tracing::info!(
                path = %store.snapshot_path().display(),
                "no snapshot found, seeding sample data"
            );
            store.save(&seed)?;
        }
        Ok(Self { store })
    }

    /// The underlying snapshot store.
    #[must_use]
    pub const fn store(&self) -> &SnapshotStore {
        &self.store
    }

    fn with_snapshot<T>(&self, apply: impl FnOnce(&mut Snapshot) -> Result<T>) -> Result<T> {
        let mut snapshot = self.store.load()?;
        let out = apply(&mut snapshot)?;
        self.store.save(&snapshot)?;
        Ok(out)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.store.load()?.projects)
    }

    fn get_project(&self, id: &str) -> Result<Project> {
        self.store
            .load()?
            .projects
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PlankError::ProjectNotFound { id: id.to_string() })
    }

    fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            created_at: draft.created_at,
        };
        let stored = project.clone();
        self.with_snapshot(move |snapshot| {
            snapshot.projects.push(project);
            Ok(())
        })?;
        Ok(stored)
    }

    fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        self.with_snapshot(|snapshot| {
            let project = snapshot
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| PlankError::ProjectNotFound { id: id.to_string() })?;
            project.apply_patch(patch);
            Ok(project.clone())
        })
    }

    fn delete_project(&self, id: &str) -> Result<()> {
        self.with_snapshot(|snapshot| {
            let before = snapshot.projects.len();
            snapshot.projects.retain(|p| p.id != id);
            if snapshot.projects.len() == before {
                return Err(PlankError::ProjectNotFound { id: id.to_string() });
            }
            // Orphaned tasks go with the project.
            snapshot.tasks.retain(|t| t.project_id != id);
            Ok(())
        })
    }

    fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .store
            .load()?
            .tasks
            .into_iter()
            .filter(|t| t.project_id == project_id)
            .collect())
    }

    fn create_task(&self, create: &TaskCreate) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id: create.project_id.clone(),
            title: create.title.clone(),
            assignee: create.assignee.clone(),
            status: create.status,
            due_date: create.due_date,
            order: create.order,
        };
        let stored = task.clone();
        self.with_snapshot(move |snapshot| {
            snapshot.tasks.push(task);
            Ok(())
        })?;
        Ok(stored)
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        self.with_snapshot(|snapshot| {
            let task = snapshot
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| PlankError::TaskNotFound { id: id.to_string() })?;
            task.apply_patch(patch);
            Ok(task.clone())
        })
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        self.with_snapshot(|snapshot| {
            let before = snapshot.tasks.len();
            snapshot.tasks.retain(|t| t.id != id);
            if snapshot.tasks.len() == before {
                return Err(PlankError::TaskNotFound { id: id.to_string() });
            }
            Ok(())
        })
    }
}

/// Stamp a new project draft from trimmed user input.
#[must_use]
pub fn project_draft(name: String, description: Option<String>) -> ProjectDraft {
    ProjectDraft {
        name,
        description,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, LocalBackend, project_draft};
    use crate::config::Config;
    use crate::model::{ProjectPatch, TaskCreate, TaskPatch, TaskStatus};
    use crate::storage::{Snapshot, SnapshotStore};
    use tempfile::TempDir;

    fn empty_backend(dir: &TempDir) -> LocalBackend {
        let store = SnapshotStore::new(dir.path());
        store.save(&Snapshot::default()).unwrap();
        LocalBackend::open(store).unwrap()
    }

    #[test]
    fn open_seeds_sample_data_exactly_once() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let local = LocalBackend::open(store.clone()).unwrap();
        let seeded = local.list_projects().unwrap();
        assert!(!seeded.is_empty());

        // Wipe the data but keep the file; re-opening must not re-seed.
        store.save(&Snapshot::default()).unwrap();
        let reopened = LocalBackend::open(store).unwrap();
        assert!(reopened.list_projects().unwrap().is_empty());
    }

    #[test]
    fn project_crud_roundtrip() {
        let dir = TempDir::new().unwrap();
        let local = empty_backend(&dir);

        let created = local
            .create_project(&project_draft("Website".to_string(), None))
            .unwrap();
        assert!(!created.id.is_empty());

        let fetched = local.get_project(&created.id).unwrap();
        assert_eq!(fetched.name, "Website");

        let updated = local
            .update_project(
                &created.id,
                &ProjectPatch {
                    name: Some("Website v2".to_string()),
                    description: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Website v2");

        local.delete_project(&created.id).unwrap();
        assert!(local.get_project(&created.id).is_err());
    }

    #[test]
    fn deleting_a_project_cascades_to_its_tasks() {
        let dir = TempDir::new().unwrap();
        let local = empty_backend(&dir);

        let project = local
            .create_project(&project_draft("Ops".to_string(), None))
            .unwrap();
        local
            .create_task(&TaskCreate {
                project_id: project.id.clone(),
                title: "Rotate keys".to_string(),
                assignee: None,
                status: TaskStatus::Todo,
                due_date: None,
                order: 1,
            })
            .unwrap();

        local.delete_project(&project.id).unwrap();
        assert!(local.list_tasks(&project.id).unwrap().is_empty());
    }

    #[test]
    fn task_updates_fail_cleanly_for_unknown_ids() {
        let dir = TempDir::new().unwrap();
        let local = empty_backend(&dir);

        let err = local
            .update_task("missing", &TaskPatch::order_only(1))
            .unwrap_err();
        assert_eq!(err.code().code(), "E2002");
        assert!(local.delete_task("missing").is_err());
    }

    #[test]
    fn from_config_prefers_local_when_forced() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            api_url: Some("http://127.0.0.1:1".to_string()),
            data_dir: dir.path().to_path_buf(),
            force_local: true,
        };
        let backend = Backend::from_config(&config).unwrap();
        assert!(!backend.is_remote());
    }

    #[test]
    fn from_config_falls_back_when_api_unreachable() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            api_url: Some("http://127.0.0.1:1".to_string()),
            data_dir: dir.path().to_path_buf(),
            force_local: false,
        };
        let backend = Backend::from_config(&config).unwrap();
        assert!(!backend.is_remote());
    }
}
