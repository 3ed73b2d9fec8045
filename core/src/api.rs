//! One asynchronous accessor per remote operation.
//!
//! Each accessor issues exactly one request: build with `ApiClient`, execute
//! with the `Transport`, parse with `ApiClient`. Errors propagate unchanged,
//! with one exception: `delete_todo` logs and discards every failure, so its
//! callers cannot tell a failed delete from a successful one. Use
//! `try_delete_todo` when the outcome matters. `update_todo` propagates like
//! every other accessor.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::transport::{HttpTransport, Transport};
use crate::types::{NewProject, NewTodo, Project, ProjectId, Todo, TodoId, TodoPatch};

pub struct Api<T> {
    client: ApiClient,
    transport: Arc<T>,
}

impl<T> Clone for Api<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Api<HttpTransport> {
    /// Accessors backed by a fresh reqwest client.
    pub fn connect(config: &ClientConfig) -> Self {
        Self::new(config, HttpTransport::new())
    }
}

impl<T: Transport> Api<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self::with_shared(config, Arc::new(transport))
    }

    pub fn with_shared(config: &ClientConfig, transport: Arc<T>) -> Self {
        Self {
            client: ApiClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let req = self.client.build_list_todos();
        self.client.parse_list_todos(self.transport.execute(req).await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let req = self.client.build_list_projects();
        self.client.parse_list_projects(self.transport.execute(req).await?)
    }

    /// The server does the filtering.
    pub async fn list_todos_by_project(&self, project_id: ProjectId) -> Result<Vec<Todo>, ApiError> {
        let req = self.client.build_list_todos_by_project(project_id);
        self.client.parse_list_todos(self.transport.execute(req).await?)
    }

    pub async fn create_todo(&self, input: &NewTodo) -> Result<Todo, ApiError> {
        let req = self.client.build_create_todo(input)?;
        self.client.parse_create_todo(self.transport.execute(req).await?)
    }

    pub async fn get_todo(&self, id: TodoId) -> Result<Todo, ApiError> {
        let req = self.client.build_get_todo(id);
        self.client.parse_get_todo(self.transport.execute(req).await?)
    }

    pub async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let req = self.client.build_update_todo(id, patch)?;
        self.client.parse_update_todo(self.transport.execute(req).await?)
    }

    /// Deletes a todo, logging and discarding any failure.
    pub async fn delete_todo(&self, id: TodoId) {
        tracing::info!(todo_id = id, "deleting todo");
        if let Err(err) = self.try_delete_todo(id).await {
            tracing::error!(todo_id = id, error = %err, "failed to delete todo");
        }
    }

    pub async fn try_delete_todo(&self, id: TodoId) -> Result<(), ApiError> {
        let req = self.client.build_delete_todo(id);
        self.client.parse_delete_todo(self.transport.execute(req).await?)
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        let req = self.client.build_get_project(id);
        let project = self.client.parse_get_project(self.transport.execute(req).await?)?;
        tracing::debug!(project_id = project.id, name = %project.name, "loaded project");
        Ok(project)
    }

    pub async fn create_project(&self, input: &NewProject) -> Result<Project, ApiError> {
        let req = self.client.build_create_project(input)?;
        self.client.parse_create_project(self.transport.execute(req).await?)
    }
}
