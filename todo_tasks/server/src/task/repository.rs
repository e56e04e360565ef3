//! Persistence gateway for tasks.
use crate::entities::{sea_orm_active_enums, todo_task};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use todo_tasks_core::{NewTask, Task, TaskStatus};

/// Single-row operations against the task table.
///
/// Reads never track entities; every write is one atomic statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository {
    /// Loads a task by its ID, returning `None` when no such row exists.
    async fn get_by_id(&self, id: u32) -> Result<Option<Task>, DbErr>;

    /// Loads every task, newest first.
    async fn get_all(&self) -> Result<Vec<Task>, DbErr>;

    /// Inserts a task created at `created_at` and returns it with its generated ID.
    async fn add(&self, new_task: NewTask, created_at: DateTime<Utc>) -> Result<Task, DbErr>;

    /// Overwrites the mutable fields of an existing row.
    async fn update(&self, task: Task) -> Result<Task, DbErr>;

    /// Removes a row. Returns `false` when nothing was deleted.
    async fn delete(&self, id: u32) -> Result<bool, DbErr>;
}

impl From<sea_orm_active_enums::TaskStatus> for TaskStatus {
    fn from(status: sea_orm_active_enums::TaskStatus) -> Self {
        match status {
            sea_orm_active_enums::TaskStatus::Pending => TaskStatus::Pending,
            sea_orm_active_enums::TaskStatus::InProgress => TaskStatus::InProgress,
            sea_orm_active_enums::TaskStatus::Completed => TaskStatus::Completed,
        }
    }
}

impl From<TaskStatus> for sea_orm_active_enums::TaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => sea_orm_active_enums::TaskStatus::Pending,
            TaskStatus::InProgress => sea_orm_active_enums::TaskStatus::InProgress,
            TaskStatus::Completed => sea_orm_active_enums::TaskStatus::Completed,
        }
    }
}

impl From<todo_task::Model> for Task {
    fn from(model: todo_task::Model) -> Self {
        Task {
            id: model.id as u32,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            completed_at: model.completed_at,
            status: model.status.into(),
        }
    }
}

/// [`TaskRepository`] backed by a sea-orm connection.
pub struct SeaOrmTaskRepository<'a> {
    db: &'a DatabaseConnection,
}

impl SeaOrmTaskRepository<'_> {
    pub fn new(db: &DatabaseConnection) -> SeaOrmTaskRepository<'_> {
        SeaOrmTaskRepository { db }
    }
}

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository<'_> {
    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: u32) -> Result<Option<Task>, DbErr> {
        // IDs beyond the column range can never exist.
        let Ok(id) = i32::try_from(id) else {
            return Ok(None);
        };
        let task = todo_task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .map(Task::from);
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Task>, DbErr> {
        let tasks = todo_task::Entity::find()
            .order_by_desc(todo_task::Column::CreatedAt)
            .order_by_desc(todo_task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn add(&self, new_task: NewTask, created_at: DateTime<Utc>) -> Result<Task, DbErr> {
        let active_model = todo_task::ActiveModel {
            title: ActiveValue::Set(new_task.title),
            description: ActiveValue::Set(new_task.description),
            status: ActiveValue::Set(new_task.status.into()),
            created_at: ActiveValue::Set(created_at),
            completed_at: ActiveValue::Set(None),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, task: Task) -> Result<Task, DbErr> {
        let id = i32::try_from(task.id).map_err(|_| DbErr::RecordNotUpdated)?;
        let active_model = todo_task::ActiveModel {
            id: ActiveValue::Unchanged(id),
            title: ActiveValue::Set(task.title),
            description: ActiveValue::Set(task.description),
            status: ActiveValue::Set(task.status.into()),
            completed_at: ActiveValue::Set(task.completed_at),
            ..Default::default()
        };
        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u32) -> Result<bool, DbErr> {
        let Ok(id) = i32::try_from(id) else {
            return Ok(false);
        };
        let result = todo_task::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
