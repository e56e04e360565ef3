use crate::task::notification::{ID_MISMATCH, Notifications};
use crate::task::{SeaOrmTaskRepository, TaskService, TaskState};
use crate::web::api::v1::{ApiError, ApiJson, ApiPath, ApiResponse, ErrorResponse};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_tasks_core::{NewTask, Task, TaskStatus, TaskUpdate};
use utoipa::ToSchema;
use validator::Validate;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier of the task
    id: u32,
    /// Short title of the task
    title: String,
    /// Optional longer description
    description: Option<String>,
    /// Instant the task was created, assigned by the server
    created_at: DateTime<Utc>,
    /// Instant the task was completed, if it was
    completed_at: Option<DateTime<Utc>>,
    /// Pending=0, InProgress=1, Completed=2
    #[schema(value_type = i32)]
    status: TaskStatus,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
            completed_at: task.completed_at,
            status: task.status,
        }
    }
}

/// Body of POST /api/task. Any client supplied creation date is ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title is required and must be at most 100 characters."
    ))]
    title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    description: Option<String>,
    /// Defaults to Pending
    #[serde(default)]
    #[schema(value_type = i32)]
    status: TaskStatus,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        NewTask {
            title: request.title,
            description: request.description,
            status: request.status,
        }
    }
}

/// Body of PUT /api/task/{id}. Every mutable field is replaced.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// Must equal the ID in the path
    id: u32,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title is required and must be at most 100 characters."
    ))]
    title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    description: Option<String>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[schema(value_type = i32)]
    status: TaskStatus,
}

impl From<UpdateTaskRequest> for TaskUpdate {
    fn from(request: UpdateTaskRequest) -> Self {
        TaskUpdate {
            id: request.id,
            title: request.title,
            description: request.description,
            completed_at: request.completed_at,
            status: request.status,
        }
    }
}

/// Handler for GET /api/tasks - Returns every task, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = ApiResponse<Vec<TaskJson>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<TaskState>,
) -> Result<Json<ApiResponse<Vec<TaskJson>>>, ApiError> {
    let service = TaskService::new(SeaOrmTaskRepository::new(&state.db));
    let tasks = service.get_all_tasks().await?;
    Ok(Json(ApiResponse::success(
        tasks.into_iter().map(TaskJson::from).collect(),
    )))
}

/// Handler for GET /api/task/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/task/{id}",
    params(("id" = u32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Successfully retrieved task", body = ApiResponse<TaskJson>),
        (status = 400, description = "Invalid task ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<TaskState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<Json<ApiResponse<TaskJson>>, ApiError> {
    let service = TaskService::new(SeaOrmTaskRepository::new(&state.db));
    let task = service.get_task_by_id(id).await?;
    Ok(Json(ApiResponse::success(task.into())))
}

/// Handler for POST /api/task - Creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/task",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = ApiResponse<TaskJson>,
            headers(("Location" = String, description = "URL of the new task"))),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<TaskState>,
    ApiJson(request): ApiJson<CreateTaskRequest>,
) -> Result<
    (
        StatusCode,
        [(header::HeaderName, String); 1],
        Json<ApiResponse<TaskJson>>,
    ),
    ApiError,
> {
    request.validate()?;

    let service = TaskService::new(SeaOrmTaskRepository::new(&state.db));
    let task = service.create_task(request.into()).await?;
    let location = format!("/api/task/{}", task.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(task.into())),
    ))
}

/// Handler for PUT /api/task/{id} - Replaces the mutable fields of a task.
///
/// Field problems and a path/body ID mismatch are collected and reported
/// together before the service is called.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/task/{id}",
    params(("id" = u32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<TaskJson>),
        (status = 400, description = "Invalid request or completion date", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    ApiPath(id): ApiPath<u32>,
    ApiJson(request): ApiJson<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<TaskJson>>, ApiError> {
    let mut notifications = Notifications::new();
    if let Err(errors) = request.validate() {
        notifications.extend(errors.into());
    }
    if request.id != id {
        notifications.add(
            ID_MISMATCH,
            format!(
                "The ID in the route ({}) does not match the ID in the body ({}).",
                id, request.id
            ),
        );
    }
    if notifications.has_notifications() {
        return Err(ApiError::Validation(notifications));
    }

    let service = TaskService::new(SeaOrmTaskRepository::new(&state.db));
    let task = service.update_task(request.into()).await?;
    Ok(Json(ApiResponse::success(task.into())))
}

/// Handler for DELETE /api/task/{id} - Deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/task/{id}",
    params(("id" = u32, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid task ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<TaskState>,
    ApiPath(id): ApiPath<u32>,
) -> Result<StatusCode, ApiError> {
    let service = TaskService::new(SeaOrmTaskRepository::new(&state.db));
    service.delete_task_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: TaskState) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler))
        .route("/task", post(create_task_handler))
        .route(
            "/task/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
