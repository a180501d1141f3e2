//! Task domain entities.

pub mod model;
pub mod priority;

pub use model::{ProjectTask, TaskStatus};
pub use priority::TaskPriority;
