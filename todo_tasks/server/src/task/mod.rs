use chrono::Utc;
use sea_orm::DbErr;
use std::sync::Arc;
use todo_tasks_core::{NewTask, Task, TaskUpdate};

pub mod api;
pub mod notification;
pub mod repository;

use notification::{INVALID_COMPLETION_DATE, Notifications};
pub use repository::{SeaOrmTaskRepository, TaskRepository};

/// Shared state for the task routes.
#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for TaskService operations.
///
/// `TaskNotFound` and `ValidationFailed` are expected business outcomes that the
/// API reports to the caller. `Database` is the only unexpected failure.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// No task exists with the requested ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    /// The request was well formed but breaks a task rule. Nothing was persisted.
    #[error("Task failed validation: {0}")]
    ValidationFailed(Notifications),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Orchestrates task rules and persistence.
pub struct TaskService<R> {
    repository: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// The task, or `TaskNotFound` when it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Retrieves every task, newest first. Returns an empty list when there are none.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repository.get_all().await?)
    }

    /// Creates a new task.
    ///
    /// The creation instant is always the current UTC time, and a new task never
    /// starts with a completion date.
    ///
    /// # Returns
    ///
    /// The created task including its generated ID.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        let created = self.repository.add(new_task, Utc::now()).await?;
        tracing::info!("Created task {}", created.id);
        Ok(created)
    }

    /// Replaces the title, description, status and completion date of a task.
    ///
    /// The completion-date rule is checked against the stored creation instant.
    /// When it fails the task is left untouched and `ValidationFailed` is returned.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, update: TaskUpdate) -> Result<Task, TaskServiceError> {
        let id = update.id;
        let mut task = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        task.apply(update);

        if !task.has_valid_completion_date() {
            tracing::info!("Rejected update of task {}: completion date precedes creation", id);
            return Err(TaskServiceError::ValidationFailed(Notifications::single(
                INVALID_COMPLETION_DATE,
                "The completion date cannot be earlier than the creation date.",
            )));
        }

        match self.repository.update(task).await {
            Ok(updated) => Ok(updated),
            // The row disappeared between the read and the write.
            Err(DbErr::RecordNotUpdated) => Err(TaskServiceError::TaskNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the task is removed, or `TaskNotFound` when it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: u32) -> Result<(), TaskServiceError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        if !self.repository.delete(id).await? {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        tracing::info!("Deleted task {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::repository::MockTaskRepository;
    use chrono::{DateTime, Duration, TimeZone};
    use mockall::predicate::*;
    use todo_tasks_core::TaskStatus;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 25, 7, 13, 34).unwrap()
    }

    fn stored_task(id: u32) -> Task {
        Task {
            id,
            title: "Buy milk".to_string(),
            description: Some("Semi-skimmed".to_string()),
            created_at: created_at(),
            completed_at: None,
            status: TaskStatus::Pending,
        }
    }

    fn update_for(id: u32, completed_at: Option<DateTime<Utc>>) -> TaskUpdate {
        TaskUpdate {
            id,
            title: "Buy oat milk".to_string(),
            description: None,
            completed_at,
            status: TaskStatus::Completed,
        }
    }

    #[tokio::test]
    async fn can_get_task_by_id() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_by_id()
            .with(eq(5))
            .times(1)
            .returning(|id| Ok(Some(stored_task(id))));

        let service = TaskService::new(repository);
        let task = service.get_task_by_id(5).await.unwrap();

        assert_eq!(task, stored_task(5));
    }

    #[tokio::test]
    async fn get_task_by_id_reports_missing_task() {
        let mut repository = MockTaskRepository::new();
        repository.expect_get_by_id().returning(|_| Ok(None));

        let service = TaskService::new(repository);
        let result = service.get_task_by_id(999).await;

        assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn can_get_empty_task_list() {
        let mut repository = MockTaskRepository::new();
        repository.expect_get_all().times(1).returning(|| Ok(vec![]));

        let service = TaskService::new(repository);

        assert!(service.get_all_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_task_assigns_creation_instant_on_the_server() {
        let before = Utc::now();
        let mut repository = MockTaskRepository::new();
        repository
            .expect_add()
            .withf(move |new_task, created_at| {
                new_task.title == "Buy milk" && *created_at >= before && *created_at <= Utc::now()
            })
            .times(1)
            .returning(|new_task, created_at| {
                Ok(Task {
                    id: 1,
                    title: new_task.title,
                    description: new_task.description,
                    created_at,
                    completed_at: None,
                    status: new_task.status,
                })
            });

        let service = TaskService::new(repository);
        let created = service
            .create_task(NewTask {
                title: "Buy milk".to_string(),
                description: None,
                status: TaskStatus::Pending,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.status, TaskStatus::Pending);
        assert_eq!(created.completed_at, None);
        assert!(created.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn update_task_replaces_all_mutable_fields() {
        let completed_at = created_at() + Duration::days(1);
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(stored_task(id))));
        repository
            .expect_update()
            .withf(move |task| {
                task.id == 5
                    && task.title == "Buy oat milk"
                    && task.description.is_none()
                    && task.status == TaskStatus::Completed
                    && task.completed_at == Some(completed_at)
                    && task.created_at == created_at()
            })
            .times(1)
            .returning(|task| Ok(task));

        let service = TaskService::new(repository);
        let updated = service
            .update_task(update_for(5, Some(completed_at)))
            .await
            .unwrap();

        assert_eq!(updated.completed_at, Some(completed_at));
        assert_eq!(updated.created_at, created_at());
    }

    #[tokio::test]
    async fn update_task_rejects_completion_before_creation_without_persisting() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_by_id()
            .returning(|id| Ok(Some(stored_task(id))));
        repository.expect_update().never();

        let service = TaskService::new(repository);
        let result = service
            .update_task(update_for(5, Some(created_at() - Duration::seconds(1))))
            .await;

        match result {
            Err(TaskServiceError::ValidationFailed(notifications)) => {
                let notifications = notifications.into_vec();
                assert_eq!(notifications.len(), 1);
                assert_eq!(notifications[0].key, INVALID_COMPLETION_DATE);
            }
            other => panic!("expected a validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_task_reports_missing_task() {
        let mut repository = MockTaskRepository::new();
        repository.expect_get_by_id().returning(|_| Ok(None));
        repository.expect_update().never();

        let service = TaskService::new(repository);
        let result = service.update_task(update_for(7, None)).await;

        assert!(matches!(result, Err(TaskServiceError::TaskNotFound(7))));
    }

    #[tokio::test]
    async fn update_task_reports_row_deleted_concurrently_as_missing() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_by_id()
            .returning(|id| Ok(Some(stored_task(id))));
        repository
            .expect_update()
            .returning(|_| Err(DbErr::RecordNotUpdated));

        let service = TaskService::new(repository);
        let result = service.update_task(update_for(5, None)).await;

        assert!(matches!(result, Err(TaskServiceError::TaskNotFound(5))));
    }

    #[tokio::test]
    async fn can_delete_existing_task() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_by_id()
            .returning(|id| Ok(Some(stored_task(id))));
        repository
            .expect_delete()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(true));

        let service = TaskService::new(repository);

        assert!(service.delete_task_by_id(5).await.is_ok());
    }

    #[tokio::test]
    async fn delete_missing_task_never_touches_the_store() {
        let mut repository = MockTaskRepository::new();
        repository.expect_get_by_id().times(2).returning(|_| Ok(None));
        repository.expect_delete().never();

        let service = TaskService::new(repository);

        for _ in 0..2 {
            let result = service.delete_task_by_id(999).await;
            assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
        }
    }

    #[tokio::test]
    async fn database_failures_propagate_as_database_errors() {
        let mut repository = MockTaskRepository::new();
        repository
            .expect_get_all()
            .returning(|| Err(DbErr::Custom("connection refused".to_string())));

        let service = TaskService::new(repository);
        let result = service.get_all_tasks().await;

        assert!(matches!(result, Err(TaskServiceError::Database(_))));
    }

    #[test]
    fn validation_failure_message_lists_notifications() {
        let error = TaskServiceError::ValidationFailed(Notifications::single(
            "title",
            "Title is required.",
        ));
        assert_eq!(
            error.to_string(),
            "Task failed validation: title: Title is required."
        );
    }
}
