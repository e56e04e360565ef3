use axum::extract::{Json, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use std::time::Duration;
use todo_tasks_client::{ClientError, HttpTaskApi, TaskApi};
use todo_tasks_core::{NewTask, TaskStatus, TaskUpdate};

fn task_json(id: u32, title: &str, status: i32) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "createdAt": "2025-05-25T07:13:34Z",
        "completedAt": null,
        "status": status
    })
}

fn not_found(id: u32) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "succeeded": false,
            "errors": [{ "key": "TaskNotFound", "message": format!("Task with ID {} was not found.", id) }]
        })),
    )
}

async fn list_tasks() -> Json<Value> {
    Json(json!({
        "succeeded": true,
        "data": [task_json(2, "Call plumber", 0), task_json(1, "Buy milk", 2)]
    }))
}

async fn get_task(Path(id): Path<u32>) -> impl IntoResponse {
    if id == 1 {
        (
            StatusCode::OK,
            Json(json!({ "succeeded": true, "data": task_json(1, "Buy milk", 2) })),
        )
    } else {
        not_found(id)
    }
}

async fn create_task(Json(body): Json<Value>) -> impl IntoResponse {
    let title = body["title"].as_str().unwrap_or_default().to_string();
    let status = body["status"].as_i64().unwrap_or_default() as i32;
    (
        StatusCode::CREATED,
        Json(json!({ "succeeded": true, "data": task_json(7, &title, status) })),
    )
}

async fn update_task(Path(_id): Path<u32>, Json(_body): Json<Value>) -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "succeeded": false,
            "errors": [{
                "key": "InvalidCompletionDate",
                "message": "The completion date cannot be earlier than the creation date."
            }]
        })),
    )
}

async fn delete_task(Path(id): Path<u32>) -> axum::response::Response {
    if id == 1 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(id).into_response()
    }
}

/// Serves `app` on an ephemeral local port and returns the API base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", address)
}

async fn stub_api() -> HttpTaskApi {
    let routes = Router::new()
        .route("/tasks", get(list_tasks))
        .route("/task", post(create_task))
        .route(
            "/task/{id}",
            get(get_task).put(update_task).delete(delete_task),
        );
    let base_url = serve(Router::new().nest("/api", routes)).await;
    HttpTaskApi::new(base_url).unwrap()
}

#[tokio::test]
async fn can_list_tasks_in_server_order() {
    let api = stub_api().await;

    let tasks = api.get_all().await.unwrap();

    let ids: Vec<u32> = tasks.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(tasks[1].status, TaskStatus::Completed);
}

#[tokio::test]
async fn can_get_task_by_id() {
    let api = stub_api().await;

    let task = api.get_by_id(1).await.unwrap();

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, None);
}

#[tokio::test]
async fn missing_task_is_reported_with_server_errors() {
    let api = stub_api().await;

    let err = api.get_by_id(999).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        ClientError::Api { status, errors } => {
            assert_eq!(status, 404);
            assert_eq!(errors[0].key, "TaskNotFound");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn can_create_task() {
    let api = stub_api().await;

    let created = api
        .create(NewTask {
            title: "Buy milk".to_string(),
            description: None,
            status: TaskStatus::InProgress,
        })
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn rejected_update_carries_error_key() {
    let api = stub_api().await;

    let err = api
        .update(TaskUpdate {
            id: 1,
            title: "Buy milk".to_string(),
            description: None,
            completed_at: None,
            status: TaskStatus::Completed,
        })
        .await
        .unwrap_err();

    assert!(
        matches!(err, ClientError::Api { status: 400, ref errors } if errors[0].key == "InvalidCompletionDate")
    );
}

#[tokio::test]
async fn can_delete_task_and_report_missing_one() {
    let api = stub_api().await;

    assert!(api.delete(1).await.is_ok());
    assert!(api.delete(2).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn response_without_envelope_is_unexpected() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let api = HttpTaskApi::new(serve(app).await).unwrap();

    let err = api.get_all().await.unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let api = HttpTaskApi::new(format!("http://{}/api", address)).unwrap();

    let err = api.get_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}

#[tokio::test]
async fn slow_server_fails_with_timeout() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "succeeded": true, "data": [] }))
        }),
    );
    let api = HttpTaskApi::with_timeout(serve(app).await, Duration::from_millis(200)).unwrap();

    let err = api.get_all().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(ref e) if e.is_timeout()));
}

#[test]
fn default_timeout_is_ten_seconds() {
    assert_eq!(todo_tasks_client::api::REQUEST_TIMEOUT, Duration::from_secs(10));
}
