use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::TaskState;
use api::v1::ApiError;

pub mod api;

/// Connects to the database, retrying with a linearly growing delay.
///
/// Makes at most `db_connect_retries + 1` attempts; the last error is returned.
#[tracing::instrument(skip(config))]
pub async fn connect_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.max_connections(config.db_max_connections);

    let mut attempt: u32 = 0;
    loop {
        match Database::connect(options.clone()).await {
            Ok(db) => return Ok(db),
            Err(err) if attempt < config.db_connect_retries => {
                attempt += 1;
                let delay = Duration::from_secs(u64::from(attempt));
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}",
                    attempt,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Builds the full application router on top of an open connection.
pub fn create_app(db: DatabaseConnection) -> Router {
    let task_state = TaskState { db: Arc::new(db) };

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(api::create_api_router(task_state))
        .method_not_allowed_fallback(method_not_allowed_handler)
        .fallback(route_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(cors::Any)
                        .allow_methods(cors::Any)
                        .allow_headers(cors::Any),
                ),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = connect_database(&config).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    axum::serve(listener, create_app(db)).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
async fn route_not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

#[tracing::instrument]
pub(crate) async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
