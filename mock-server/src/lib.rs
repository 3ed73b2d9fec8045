use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub project_id: u64,
    #[serde(default)]
    pub tag_ids: Vec<u64>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub project_id: u64,
    #[serde(default)]
    pub tag_ids: Vec<u64>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub project_id: Option<u64>,
    pub tag_ids: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFilter {
    pub project_id: Option<u64>,
}

/// In-memory contents of the server. Ids are assigned as one past the
/// highest id already stored in the same collection.
#[derive(Debug, Default)]
pub struct Store {
    pub todos: BTreeMap<u64, Todo>,
    pub projects: BTreeMap<u64, Project>,
}

impl Store {
    pub fn with_fixtures(projects: Vec<Project>, todos: Vec<Todo>) -> Self {
        Self {
            todos: todos.into_iter().map(|t| (t.id, t)).collect(),
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    fn next_todo_id(&self) -> u64 {
        self.todos.keys().next_back().map_or(1, |id| id + 1)
    }

    fn next_project_id(&self) -> u64 {
        self.projects.keys().next_back().map_or(1, |id| id + 1)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::default()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

/// `projectId=0` means "no filter".
async fn list_todos(State(db): State<Db>, Query(filter): Query<TodoFilter>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let todos = store
        .todos
        .values()
        .filter(|t| match filter.project_id {
            None | Some(0) => true,
            Some(project_id) => t.project_id == project_id,
        })
        .cloned()
        .collect();
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut store = db.write().await;
    let todo = Todo {
        id: store.next_todo_id(),
        title: input.title,
        description: input.description,
        created_at: input.created_at,
        project_id: input.project_id,
        tag_ids: input.tag_ids,
        priority: input.priority,
        due_date: input.due_date,
        completed: input.completed,
    };
    store.todos.insert(todo.id, todo.clone());
    tracing::debug!(todo_id = todo.id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, StatusCode> {
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = description;
    }
    if let Some(created_at) = input.created_at {
        todo.created_at = created_at;
    }
    if let Some(project_id) = input.project_id {
        todo.project_id = project_id;
    }
    if let Some(tag_ids) = input.tag_ids {
        todo.tag_ids = tag_ids;
    }
    if let Some(priority) = input.priority {
        todo.priority = priority;
    }
    if let Some(due_date) = input.due_date {
        todo.due_date = due_date;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut store = db.write().await;
    match store.todos.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_projects(State(db): State<Db>) -> Json<Vec<Project>> {
    let store = db.read().await;
    Json(store.projects.values().cloned().collect())
}

async fn get_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Project>, StatusCode> {
    let store = db.read().await;
    store.projects.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<CreateProject>,
) -> (StatusCode, Json<Project>) {
    let mut store = db.write().await;
    let project = Project {
        id: store.next_project_id(),
        name: input.name,
        description: input.description,
        created_at: input.created_at,
        updated_at: input.updated_at,
    };
    store.projects.insert(project.id, project.clone());
    tracing::debug!(project_id = project.id, "created project");
    (StatusCode::CREATED, Json(project))
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
