use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a task title.
pub const TITLE_MAX_LEN: usize = 100;
/// Maximum number of characters allowed in a task description.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Lifecycle state of a task.
///
/// On the wire a status is its integer value: Pending=0, InProgress=1, Completed=2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i32", into = "i32"))]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Returned when an integer does not name a [`TaskStatus`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{0} is not a valid task status")]
pub struct InvalidStatus(pub i32);

impl TaskStatus {
    /// All statuses in wire order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Integer wire value of the status.
    pub fn value(self) -> i32 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    /// Parses a status filter label.
    ///
    /// Accepts the variant names as well as the labels used by the task list
    /// filter (`Pendente`, `EmProgresso`, `Concluída`). Anything else, the empty
    /// string included, yields `None`, which callers treat as "no status filter".
    pub fn from_label(label: &str) -> Option<TaskStatus> {
        match label {
            "Pending" | "Pendente" => Some(TaskStatus::Pending),
            "InProgress" | "EmProgresso" => Some(TaskStatus::InProgress),
            "Completed" | "Concluída" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl TryFrom<i32> for TaskStatus {
    type Error = InvalidStatus;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TaskStatus::Pending),
            1 => Ok(TaskStatus::InProgress),
            2 => Ok(TaskStatus::Completed),
            other => Err(InvalidStatus(other)),
        }
    }
}

impl From<TaskStatus> for i32 {
    fn from(status: TaskStatus) -> Self {
        status.value()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single task as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}

impl Task {
    /// Checks the completion-date rule for this task.
    pub fn has_valid_completion_date(&self) -> bool {
        is_valid_completion_date(self)
    }

    /// Replaces every mutable field with the values from `update`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply(&mut self, update: TaskUpdate) {
        self.title = update.title;
        self.description = update.description;
        self.status = update.status;
        self.completed_at = update.completed_at;
    }
}

/// Returns true when the task has no completion date, or when it was completed
/// at or after the moment it was created.
pub fn is_valid_completion_date(task: &Task) -> bool {
    match task.completed_at {
        Some(completed_at) => completed_at >= task.created_at,
        None => true,
    }
}

/// Input for creating a task. The creation instant is always assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NewTask {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    pub status: TaskStatus,
}

/// Full-replace input for updating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TaskUpdate {
    pub id: u32,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
}
