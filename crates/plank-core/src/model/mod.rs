//! Data model: projects, tasks, and their wire shapes.

pub mod project;
pub mod task;

pub use project::{Project, ProjectDraft, ProjectPatch};
pub use task::{ParseStatusError, Task, TaskCreate, TaskDraft, TaskPatch, TaskStatus};
