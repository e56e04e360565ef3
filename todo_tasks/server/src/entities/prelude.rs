pub use super::todo_task::Entity as TodoTask;
