//! Advisory file locking for the snapshot.
//!
//! Concurrent `pk` processes coordinate through one lock file next to the
//! snapshot: reads take a shared lock, writes an exclusive one. Locks are
//! advisory; acquisition polls with a bounded timeout.

use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

/// Lock acquisition failures.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("lock timed out after {waited:?} at {}", path.display())]
    Timeout { path: PathBuf, waited: Duration },

    #[error("lock I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy)]
enum LockKind {
    Shared,
    Exclusive,
}

/// RAII guard over the snapshot lock file. Released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Acquire a shared lock for reading the snapshot.
    pub fn acquire_shared(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Self::acquire(path, timeout, LockKind::Shared)
    }

    /// Acquire an exclusive lock for writing the snapshot.
    pub fn acquire_exclusive(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        Self::acquire(path, timeout, LockKind::Exclusive)
    }

    fn acquire(path: &Path, timeout: Duration, kind: LockKind) -> Result<Self, LockError> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "lock path has no parent")
        })?;
        fs::create_dir_all(parent)?;

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            let contended = match kind {
                LockKind::Shared => file.try_lock_shared().is_err(),
                LockKind::Exclusive => file.try_lock_exclusive().is_err(),
            };

            if !contended {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Explicitly release the lock. Release also happens automatically on drop.
    pub fn release(self) {
        let _ = self.file.unlock();
    }

    /// Return the lock file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::{LockError, SnapshotLock};
    use std::{path::PathBuf, time::Duration};

    fn lock_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push("plank_lock_tests");
        path.push(name);
        path
    }

    #[test]
    fn exclusive_lock_acquires_and_releases() -> Result<(), LockError> {
        let path = lock_path("basic.lock");
        let lock = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(50))?;
        assert_eq!(lock.path(), path.as_path());
        lock.release();
        Ok(())
    }

    #[test]
    fn exclusive_lock_times_out_when_held() {
        let path = lock_path("timeout.lock");
        let _guard = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(50)).unwrap();
        let err = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(20)).unwrap_err();

        assert!(matches!(err, LockError::Timeout { path: p, .. } if p == path));
    }

    #[test]
    fn shared_locks_are_compatible() -> Result<(), LockError> {
        let path = lock_path("read-share.lock");
        let first = SnapshotLock::acquire_shared(&path, Duration::from_millis(50))?;
        let second = SnapshotLock::acquire_shared(&path, Duration::from_millis(50))?;

        first.release();
        second.release();
        Ok(())
    }

    #[test]
    fn exclusive_blocks_shared() {
        let path = lock_path("write-blocks-read.lock");
        let _write = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(50)).unwrap();

        let started = std::time::Instant::now();
        let read = SnapshotLock::acquire_shared(&path, Duration::from_millis(20));

        assert!(matches!(read, Err(LockError::Timeout { .. })));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn drop_releases_for_follow_up_lock() -> Result<(), LockError> {
        let path = lock_path("release-followup.lock");
        {
            let _first = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(50))?;
        }

        let _second = SnapshotLock::acquire_exclusive(&path, Duration::from_millis(50))?;
        Ok(())
    }
}
