use chrono::{DateTime, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectOptions, Database, DatabaseConnection};
use todo_tasks_server::entities::{sea_orm_active_enums::TaskStatus, todo_task};

/// Opens a private in-memory SQLite database with every migration applied.
///
/// The pool holds exactly one connection so the database lives as long as the
/// returned handle.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();

    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Inserts a task row directly, bypassing the service, and returns its ID.
#[allow(dead_code)]
pub async fn insert_task(
    db: &DatabaseConnection,
    title: &str,
    status: TaskStatus,
    created_at: DateTime<Utc>,
) -> u32 {
    let model = todo_task::ActiveModel {
        title: ActiveValue::Set(title.to_string()),
        description: ActiveValue::Set(None),
        status: ActiveValue::Set(status),
        created_at: ActiveValue::Set(created_at),
        completed_at: ActiveValue::Set(None),
        ..Default::default()
    };
    let inserted = model.insert(db).await.expect("Failed to insert task");
    inserted.id as u32
}
