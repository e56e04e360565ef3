//! Checks applied to user input before any request is sent.
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use todo_tasks_core::task::{DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use todo_tasks_core::{NewTask, Task, TaskStatus, TaskUpdate, is_valid_completion_date};
use validator::{Validate, ValidationError, ValidationErrors};

/// Editable fields of a task as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TaskForm {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    pub description: String,
    pub status: TaskStatus,
    /// Ignored when creating a task.
    pub completed_at: Option<DateTime<Utc>>,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(
            ValidationError::new("required").with_message(Cow::Borrowed("Title is required."))
        );
    }
    if title.trim().chars().count() > TITLE_MAX_LEN {
        return Err(ValidationError::new("length").with_message(Cow::Owned(format!(
            "Title must be at most {} characters.",
            TITLE_MAX_LEN
        ))));
    }
    Ok(())
}

impl TaskForm {
    /// Prefills the form from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            completed_at: task.completed_at,
        }
    }

    /// Validates the form and produces the create input.
    pub fn into_new_task(self) -> Result<NewTask, ValidationErrors> {
        self.validate()?;
        Ok(NewTask {
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            status: self.status,
        })
    }

    /// Validates the form against `existing` and produces the full-replace update.
    ///
    /// On top of the field checks, a completion date must not precede the
    /// task's creation date.
    pub fn into_update(self, existing: &Task) -> Result<TaskUpdate, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let candidate = Task {
            id: existing.id,
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            created_at: existing.created_at,
            completed_at: self.completed_at,
            status: self.status,
        };
        if !is_valid_completion_date(&candidate) {
            errors.add(
                "completedAt",
                ValidationError::new("before_creation").with_message(Cow::Borrowed(
                    "The completion date cannot be earlier than the creation date.",
                )),
            );
        }
        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(TaskUpdate {
            id: candidate.id,
            title: candidate.title,
            description: candidate.description,
            completed_at: candidate.completed_at,
            status: candidate.status,
        })
    }
}

fn non_empty(description: String) -> Option<String> {
    if description.is_empty() {
        None
    } else {
        Some(description)
    }
}
