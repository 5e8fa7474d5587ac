//! The snapshot file: every project and task, one JSON document.
//!
//! This is the offline analog of the remote API's whole dataset. Writes go
//! through a temp file and an atomic rename under an exclusive advisory
//! lock; readers take a shared lock. A missing file is the empty snapshot,
//! never an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PlankError, Result};
use crate::model::{Project, Task};
use crate::storage::lock::SnapshotLock;

const SNAPSHOT_FILE: &str = "store.json";
const LOCK_FILE: &str = "store.lock";
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the local mode persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    /// Returns `true` if the snapshot holds no data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty()
    }
}

/// Handle on a snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The platform data directory for plank (`…/plank` under the user data
    /// dir), falling back to a hidden directory in the working directory on
    /// platforms without one.
    #[must_use]
    pub fn default_root() -> PathBuf {
        dirs::data_dir().map_or_else(|| PathBuf::from(".plank"), |dir| dir.join("plank"))
    }

    /// Path of the snapshot JSON file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Returns `true` if a snapshot file exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.snapshot_path().is_file()
    }

    /// Read the snapshot. A missing file yields the empty snapshot.
    pub fn load(&self) -> Result<Snapshot> {
        let path = self.snapshot_path();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no snapshot on disk, starting empty");
            return Ok(Snapshot::default());
        }

        let _guard = SnapshotLock::acquire_shared(&self.lock_path(), LOCK_TIMEOUT)?;
        let raw = fs::read_to_string(&path).map_err(|source| PlankError::SnapshotIo {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| PlankError::SnapshotCorrupt { path, source })
    }

    /// Replace the snapshot on disk via temp file + atomic rename.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path();
        let io_err = |source| PlankError::SnapshotIo {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(io_err)?;
        let _guard = SnapshotLock::acquire_exclusive(&self.lock_path(), LOCK_TIMEOUT)?;

        let body = serde_json::to_vec_pretty(snapshot).map_err(|source| {
            PlankError::SnapshotCorrupt {
                path: path.clone(),
                source,
            }
        })?;

        let tmp = self.root.join(format!("{SNAPSHOT_FILE}.tmp"));
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::debug!(
            path = %path.display(),
            projects = snapshot.projects.len(),
            tasks = snapshot.tasks.len(),
            "snapshot written"
        );
        Ok(())
    }
}
