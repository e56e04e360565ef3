//! Status and free-text filtering over a task list.
use crate::task::{Task, TaskStatus};

/// Criteria for the filtered task view.
///
/// Both criteria compose with a logical AND. The filter is always applied to a
/// full list; it keeps no state between applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact match on the task status. `None` keeps every status.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring searched in the title or the description.
    /// An empty term keeps every task.
    pub search_term: String,
}

impl TaskFilter {
    pub fn new(status: Option<TaskStatus>, search_term: impl Into<String>) -> Self {
        Self {
            status,
            search_term: search_term.into(),
        }
    }

    /// Returns true when the task satisfies both criteria.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if self.search_term.is_empty() {
            return true;
        }

        let needle = self.search_term.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
    }

    /// Produces the filtered view of `tasks`, preserving their order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect()
    }
}
