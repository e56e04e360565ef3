use crate::task::{self, TaskState};
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

pub mod v1;

/// Path prefix shared by every JSON API route.
pub const API_PREFIX: &str = "/api";

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo Tasks API", description = "Personal task tracking"),
    paths(
        task::api::v1::get_tasks_handler,
        task::api::v1::get_task_handler,
        task::api::v1::create_task_handler,
        task::api::v1::update_task_handler,
        task::api::v1::delete_task_handler,
    ),
    components(schemas(
        task::api::v1::TaskJson,
        task::api::v1::CreateTaskRequest,
        task::api::v1::UpdateTaskRequest,
        task::notification::Notification,
        v1::ErrorResponse,
    )),
    tags((name = "Tasks", description = "Create, list, edit and delete tasks"))
)]
pub struct ApiDoc;

#[tracing::instrument]
async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(task_state: TaskState) -> Router {
    let api_routes = task::api::v1::create_api_router(task_state)
        .route("/docs/openapi.json", get(openapi_handler))
        .method_not_allowed_fallback(super::method_not_allowed_handler);
    Router::new().nest(API_PREFIX, api_routes)
}
