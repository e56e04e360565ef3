use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use todo_tasks_core::validation::field_messages;
use todo_tasks_client::{HttpTaskApi, TaskApi, TaskForm, TaskStore};
use todo_tasks_core::{Task, TaskStatus};
use tracing_subscriber::EnvFilter;

/// Track personal tasks against a todo-tasks server.
#[derive(Parser, Debug)]
#[command(name = "todo-tasks", version)]
struct Cli {
    /// Base URL of the task API
    #[arg(
        long,
        env = "TODO_TASKS_API",
        default_value = "http://localhost:8080/api"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// List tasks, newest first
    List {
        /// Only show tasks with this status (Pending, InProgress, Completed)
        #[arg(long)]
        status: Option<String>,
        /// Only show tasks whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a task
    Add {
        title: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status, default_value = "Pending")]
        status: TaskStatus,
    },
    /// Change an existing task. Omitted options keep their current value.
    Edit {
        id: u32,
        #[arg(long)]
        title: Option<String>,
        /// Pass an empty string to remove the description
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long, value_parser = parse_completed_at, conflicts_with = "not_completed")]
        completed_at: Option<DateTime<Utc>>,
        /// Clear the completion date
        #[arg(long)]
        not_completed: bool,
    },
    /// Delete a task
    Delete { id: u32 },
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    if let Some(status) = TaskStatus::from_label(value) {
        return Ok(status);
    }
    value
        .parse::<i32>()
        .ok()
        .and_then(|number| TaskStatus::try_from(number).ok())
        .ok_or_else(|| format!("unknown status '{}'", value))
}

fn parse_completed_at(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("invalid date '{}'", value))
}

fn print_task(task: &Task) {
    let completed = task
        .completed_at
        .map(|completed_at| completed_at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:>5}  {:<11}  {}  {:<10}  {}",
        task.id,
        task.status.label(),
        task.created_at.format("%Y-%m-%d"),
        completed,
        task.title
    );
    if let Some(description) = &task.description {
        println!("       {}", description);
    }
}

fn form_error(errors: &validator::ValidationErrors) -> anyhow::Error {
    let messages: Vec<String> = field_messages(errors)
        .into_iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect();
    anyhow::anyhow!("Invalid task: {}", messages.join("; "))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpTaskApi::new(&cli.base_url).context("Failed to build HTTP client")?;
    let mut store = TaskStore::new(api.clone());

    match cli.command {
        Commands::List { status, search } => {
            store.fetch_tasks().await?;
            if let Some(label) = status {
                store.set_status_filter_label(&label);
            }
            if let Some(term) = search {
                store.set_search_term(term);
            }
            if store.filtered_tasks().is_empty() {
                println!("No tasks found.");
            }
            for task in store.filtered_tasks() {
                print_task(task);
            }
        }
        Commands::Add {
            title,
            description,
            status,
        } => {
            let form = TaskForm {
                title,
                description: description.unwrap_or_default(),
                status,
                completed_at: None,
            };
            let new_task = form.into_new_task().map_err(|errors| form_error(&errors))?;
            let created = store.add_task(new_task).await?;
            println!("Task added with ID {}", created.id);
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
            completed_at,
            not_completed,
        } => {
            let existing = api.get_by_id(id).await?;
            let mut form = TaskForm::from_task(&existing);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(status) = status {
                form.status = status;
            }
            if completed_at.is_some() {
                form.completed_at = completed_at;
            } else if not_completed {
                form.completed_at = None;
            }
            let update = form
                .into_update(&existing)
                .map_err(|errors| form_error(&errors))?;
            let updated = store.update_task(update).await?;
            println!("Task {} updated", updated.id);
            print_task(&updated);
        }
        Commands::Delete { id } => {
            store.delete_task(id).await?;
            println!("Task {} deleted", id);
        }
    }

    // The change itself went through; only the refresh afterwards failed.
    if let Some(message) = store.error() {
        eprintln!("Warning: {}", message);
    }
    Ok(())
}
