//! Per-request accumulation of reportable problems.
//!
//! A [`Notifications`] value is created for a single request, filled by the
//! checks that run while handling it, and reported as a whole once the
//! request is finished. It is passed around explicitly and never shared
//! between requests.
use serde::{Deserialize, Serialize};
use std::fmt;
use todo_tasks_core::validation::field_messages;
use utoipa::ToSchema;

pub const TASK_NOT_FOUND: &str = "TaskNotFound";
pub const INVALID_COMPLETION_DATE: &str = "InvalidCompletionDate";
pub const ID_MISMATCH: &str = "IdMismatch";
pub const INVALID_REQUEST_BODY: &str = "InvalidRequestBody";
pub const INVALID_ROUTE_PARAMETER: &str = "InvalidRouteParameter";
pub const ROUTE_NOT_FOUND: &str = "RouteNotFound";
pub const METHOD_NOT_ALLOWED: &str = "MethodNotAllowed";
pub const INTERNAL_SERVER_ERROR: &str = "InternalServerError";

/// A single reportable problem, identified by a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    /// Stable identifier of the problem, e.g. `TaskNotFound` or a field name
    pub key: String,
    /// Human readable description
    pub message: String,
}

impl Notification {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an accumulator holding exactly one notification.
    pub fn single(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut notifications = Self::new();
        notifications.add(key, message);
        notifications
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.items.push(Notification::new(key, message));
    }

    /// Appends every notification from `other`.
    pub fn extend(&mut self, other: Notifications) {
        self.items.extend(other.items);
    }

    pub fn has_notifications(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl fmt::Display for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .items
            .iter()
            .map(|notification| format!("{}: {}", notification.key, notification.message))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Converts field validation failures into notifications keyed by field name.
///
/// Only the first failure of each field is reported, and fields are reported in
/// alphabetical order so responses are stable.
impl From<validator::ValidationErrors> for Notifications {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut notifications = Notifications::new();
        for (field, message) in field_messages(&errors) {
            notifications.add(field, message);
        }
        notifications
    }
}
