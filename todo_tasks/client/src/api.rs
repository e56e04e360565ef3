//! HTTP gateway to the task API.
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use todo_tasks_core::{NewTask, Task, TaskUpdate};

/// Every request is abandoned after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry of a failed response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    pub key: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with an error envelope.
    #[error("{}", render_errors(.errors))]
    Api { status: u16, errors: Vec<ErrorEntry> },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// True when the server reported that the task does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

fn render_errors(errors: &[ErrorEntry]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    succeeded: bool,
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

/// Operations the view state needs from the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi {
    async fn get_all(&self) -> Result<Vec<Task>, ClientError>;

    async fn get_by_id(&self, id: u32) -> Result<Task, ClientError>;

    async fn create(&self, new_task: NewTask) -> Result<Task, ClientError>;

    async fn update(&self, update: TaskUpdate) -> Result<Task, ClientError>;

    async fn delete(&self, id: u32) -> Result<(), ClientError>;
}

/// [`TaskApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Creates a gateway for an API rooted at `base_url`, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Like [`HttpTaskApi::new`], abandoning each request after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into [`ClientError::Api`] when it carries an error envelope.
async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    match response.json::<Envelope<serde_json::Value>>().await {
        Ok(envelope) if !envelope.errors.is_empty() => ClientError::Api {
            status,
            errors: envelope.errors,
        },
        _ => ClientError::UnexpectedResponse(format!(
            "HTTP {} without an error envelope",
            status
        )),
    }
}

async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let envelope: Envelope<T> = response.json().await?;
    match envelope {
        Envelope {
            succeeded: true,
            data: Some(data),
            ..
        } => Ok(data),
        Envelope { errors, .. } if !errors.is_empty() => {
            Err(ClientError::UnexpectedResponse(render_errors(&errors)))
        }
        _ => Err(ClientError::UnexpectedResponse(
            "Successful response without data".to_string(),
        )),
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(self.url("/tasks")).send().await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: u32) -> Result<Task, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/task/{}", id)))
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, new_task: NewTask) -> Result<Task, ClientError> {
        let response = self
            .client
            .post(self.url("/task"))
            .json(&new_task)
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, update: TaskUpdate) -> Result<Task, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/task/{}", update.id)))
            .json(&update)
            .send()
            .await?;
        read_data(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u32) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/task/{}", id)))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
