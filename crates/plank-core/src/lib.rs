//! plank-core: the state layer behind the `pk` CLI.
//!
//! Projects and tasks live in [`store`] containers that persist through a
//! [`backend::Backend`] — the remote REST API when configured and
//! reachable, the local JSON snapshot otherwise. Task ordering semantics
//! (per-column contiguous positions) live entirely in
//! [`store::TasksStore`].
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::PlankError`] values inside the crate;
//!   `anyhow::Result` belongs to binaries.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod sample;
pub mod storage;
pub mod store;

pub use backend::Backend;
pub use error::{ErrorCode, PlankError, Result};
pub use model::{Project, Task, TaskStatus};
pub use store::{Board, ProjectsStore, TasksStore};
