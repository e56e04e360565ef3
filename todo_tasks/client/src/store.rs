//! Client view state: the last fetched task list and its filtered view.
use crate::api::{ClientError, TaskApi};
use todo_tasks_core::{NewTask, Task, TaskFilter, TaskStatus, TaskUpdate};

/// Holds the task list as last fetched together with the current filter.
///
/// The filtered view is recomputed whenever the list or the filter changes, so
/// reading it never touches the network. A failed request leaves the list as it
/// was and records a user-facing message in [`TaskStore::error`].
pub struct TaskStore<A> {
    api: A,
    tasks: Vec<Task>,
    filter: TaskFilter,
    filtered: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl<A: TaskApi> TaskStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            filter: TaskFilter::default(),
            filtered: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filtered_tasks(&self) -> &[Task] {
        &self.filtered
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message describing the last failed request, cleared by the next successful fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        self.filter.status = status;
        self.refresh_view();
    }

    /// Sets the status filter from a label. Unknown labels clear it.
    pub fn set_status_filter_label(&mut self, label: &str) {
        self.set_status_filter(TaskStatus::from_label(label));
    }

    pub fn set_search_term(&mut self, search_term: impl Into<String>) {
        self.filter.search_term = search_term.into();
        self.refresh_view();
    }

    /// Replaces the list with the server's current one.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tasks(&mut self) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.get_all().await;
        self.loading = false;

        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.error = None;
                self.refresh_view();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Failed to fetch tasks: {}", err);
                self.error = Some(format!("Could not load tasks: {}", err));
                Err(err)
            }
        }
    }

    /// Creates a task, shows it immediately, then resynchronizes with the server.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(&mut self, new_task: NewTask) -> Result<Task, ClientError> {
        self.loading = true;
        let result = self.api.create(new_task).await;
        self.loading = false;

        let created = self.record_failure(result, "Could not create task")?;
        self.tasks.insert(0, created.clone());
        self.refresh_view();
        self.resync().await;
        Ok(created)
    }

    /// Updates a task, patches it locally, then resynchronizes with the server.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&mut self, update: TaskUpdate) -> Result<Task, ClientError> {
        self.loading = true;
        let result = self.api.update(update).await;
        self.loading = false;

        let updated = self.record_failure(result, "Could not update task")?;
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *task = updated.clone();
        }
        self.refresh_view();
        self.resync().await;
        Ok(updated)
    }

    /// Deletes a task, drops it locally, then resynchronizes with the server.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&mut self, id: u32) -> Result<(), ClientError> {
        self.loading = true;
        let result = self.api.delete(id).await;
        self.loading = false;

        self.record_failure(result, "Could not delete task")?;
        self.tasks.retain(|task| task.id != id);
        self.refresh_view();
        self.resync().await;
        Ok(())
    }

    fn record_failure<T>(
        &mut self,
        result: Result<T, ClientError>,
        context: &str,
    ) -> Result<T, ClientError> {
        result.map_err(|err| {
            tracing::warn!("{}: {}", context, err);
            self.error = Some(format!("{}: {}", context, err));
            err
        })
    }

    /// Refetch after a successful mutation. A failure here keeps the patched list.
    async fn resync(&mut self) {
        let _ = self.fetch_tasks().await;
    }

    fn refresh_view(&mut self) {
        self.filtered = self.filter.apply(&self.tasks);
    }
}
