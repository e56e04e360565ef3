//! Client side of the task tracker: HTTP gateway, view state and form checks.
pub mod api;
pub mod form;
pub mod store;

pub use api::{ClientError, ErrorEntry, HttpTaskApi, TaskApi};
pub use form::TaskForm;
pub use store::TaskStore;
