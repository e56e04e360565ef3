//! Response envelope, error mapping and extractors shared by the v1 JSON API.
use crate::task::TaskServiceError;
use crate::task::notification::{
    INTERNAL_SERVER_ERROR, INVALID_REQUEST_BODY, INVALID_ROUTE_PARAMETER, METHOD_NOT_ALLOWED,
    Notification, Notifications, ROUTE_NOT_FOUND, TASK_NOT_FOUND,
};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`
    pub succeeded: bool,
    /// Response payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            succeeded: true,
            data,
        }
    }
}

/// Failed response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub succeeded: bool,
    /// Every problem found while handling the request
    pub errors: Vec<Notification>,
}

impl ErrorResponse {
    pub fn new(notifications: Notifications) -> Self {
        Self {
            succeeded: false,
            errors: notifications.into_vec(),
        }
    }
}

/// Errors surfaced by API handlers. Every variant renders as an [`ErrorResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input or a broken task rule.
    #[error("Validation failed: {0}")]
    Validation(Notifications),
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    #[error("Route not found")]
    RouteNotFound,
    /// The route exists but does not accept the request method.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// Unexpected failure. The detail is logged and never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TaskNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let notifications = match self {
            ApiError::Validation(notifications) => notifications,
            ApiError::TaskNotFound(id) => Notifications::single(
                TASK_NOT_FOUND,
                format!("Task with ID {} was not found.", id),
            ),
            ApiError::RouteNotFound => Notifications::single(
                ROUTE_NOT_FOUND,
                "The requested resource does not exist.",
            ),
            ApiError::MethodNotAllowed => Notifications::single(
                METHOD_NOT_ALLOWED,
                "The requested resource does not support this HTTP method.",
            ),
            ApiError::Internal(detail) => {
                tracing::error!("Unexpected error while handling request: {}", detail);
                Notifications::single(
                    INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred. Please try again later.",
                )
            }
        };

        (status_code, Json(ErrorResponse::new(notifications))).into_response()
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(id) => ApiError::TaskNotFound(id),
            TaskServiceError::ValidationFailed(notifications) => ApiError::Validation(notifications),
            TaskServiceError::Database(db_err) => ApiError::Internal(db_err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(Notifications::single(
            INVALID_REQUEST_BODY,
            rejection.body_text(),
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(Notifications::single(
            INVALID_ROUTE_PARAMETER,
            rejection.body_text(),
        ))
    }
}

/// JSON body extractor whose rejection is rendered as an [`ErrorResponse`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejection is rendered as an [`ErrorResponse`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
