//! Core domain model and business rules for todo tasks.
pub mod filter;
pub mod task;
#[cfg(feature = "validator")]
pub mod validation;

pub use filter::TaskFilter;
pub use task::{InvalidStatus, NewTask, Task, TaskStatus, TaskUpdate, is_valid_completion_date};
