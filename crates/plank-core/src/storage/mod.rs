//! Local persistence: a single JSON snapshot behind an advisory lock.

pub mod lock;
pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotStore};
