//! In-memory cache of todos and the active project, with a derived view
//! filtered by the selected project.
//!
//! # Design
//! The store is constructed explicitly and shared by `Arc`; there is no
//! global instance. State sits behind a `std::sync::Mutex` that is only held
//! for field reads and writes, never across an await point.
//!
//! Fetches for the same entity may complete in any order. Each entity keeps
//! a monotonic request sequence, and a completion is applied only if no
//! newer request for that entity was issued in the meantime. Stale results
//! are dropped; errors still reach the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::api::Api;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Project, ProjectId, Todo};

/// Project id sent to the server when no project is selected.
pub const ALL_PROJECTS: ProjectId = 0;

/// Todos belonging to `selected`, in their original order, or all of them
/// when nothing is selected.
pub fn filter_todos(todos: &[Todo], selected: Option<ProjectId>) -> Vec<Todo> {
    match selected {
        None => todos.to_vec(),
        Some(project_id) => todos
            .iter()
            .filter(|todo| todo.project_id == project_id)
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Default)]
struct Sequence {
    issued: u64,
}

impl Sequence {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.issued == ticket
    }
}

#[derive(Debug, Default)]
struct StoreState {
    todos: Vec<Todo>,
    project: Option<Project>,
    selected_project_id: Option<ProjectId>,
    todos_seq: Sequence,
    project_seq: Sequence,
}

pub struct TodoStore<T> {
    api: Api<T>,
    state: Mutex<StoreState>,
}

impl<T: Transport> TodoStore<T> {
    pub fn new(api: Api<T>) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn api(&self) -> &Api<T> {
        &self.api
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.state().todos.clone()
    }

    pub fn project(&self) -> Option<Project> {
        self.state().project.clone()
    }

    pub fn selected_project_id(&self) -> Option<ProjectId> {
        self.state().selected_project_id
    }

    /// Recomputed from `todos` and the selection on every call.
    pub fn filtered_todos(&self) -> Vec<Todo> {
        let state = self.state();
        filter_todos(&state.todos, state.selected_project_id)
    }

    /// Replaces the cached list. Any todo fetch still in flight is
    /// superseded and its result will be discarded.
    pub fn set_todos(&self, todos: Vec<Todo>) {
        let mut state = self.state();
        state.todos_seq.issue();
        state.todos = todos;
    }

    /// Fetches the todos of the selected project (every todo when none is
    /// selected) and replaces the cache. On error the cache is untouched.
    pub async fn fetch_todos(&self) -> Result<(), ApiError> {
        let (ticket, project_id) = {
            let mut state = self.state();
            (
                state.todos_seq.issue(),
                state.selected_project_id.unwrap_or(ALL_PROJECTS),
            )
        };

        let fetched = self.api.list_todos_by_project(project_id).await?;

        let mut state = self.state();
        if state.todos_seq.is_current(ticket) {
            state.todos = fetched;
        } else {
            tracing::debug!(project_id, ticket, "discarding stale todo fetch");
        }
        Ok(())
    }

    /// Loads one project and makes it the active one. On error the
    /// previously loaded project is kept.
    pub async fn fetch_project_data(&self, id: ProjectId) -> Result<(), ApiError> {
        let ticket = self.state().project_seq.issue();

        let project = self.api.get_project(id).await?;

        let mut state = self.state();
        if state.project_seq.is_current(ticket) {
            state.project = Some(project);
        } else {
            tracing::debug!(project_id = id, ticket, "discarding stale project load");
        }
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport + 'static> TodoStore<T> {
    /// Selects `id` immediately, then loads its details in the background.
    ///
    /// `selected_project_id` reflects the new id as soon as this returns;
    /// `project` catches up when the load completes. The selection stays in
    /// place if the load fails. Await the handle to observe the outcome.
    pub fn select_project(self: &Arc<Self>, id: ProjectId) -> JoinHandle<Result<(), ApiError>> {
        self.state().selected_project_id = Some(id);
        tracing::info!(project_id = id, "selected project");

        let store = Arc::clone(self);
        tokio::spawn(async move {
            let result = store.fetch_project_data(id).await;
            if let Err(err) = &result {
                tracing::warn!(project_id = id, error = %err, "failed to load selected project");
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn todo(id: u64, project_id: ProjectId) -> Todo {
        Todo {
            id,
            title: format!("todo {id}"),
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            project_id,
            tag_ids: Vec::new(),
            priority: None,
            due_date: None,
            completed: false,
        }
    }

    #[test]
    fn no_selection_returns_everything() {
        let todos = vec![todo(1, 1), todo(2, 2), todo(3, 1)];
        assert_eq!(filter_todos(&todos, None), todos);
    }

    #[test]
    fn selection_keeps_matching_todos_in_order() {
        let todos = vec![todo(1, 1), todo(2, 2), todo(3, 1), todo(4, 3)];
        let ids: Vec<u64> = filter_todos(&todos, Some(1)).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn selection_without_matches_is_empty() {
        let todos = vec![todo(1, 1), todo(2, 2)];
        assert!(filter_todos(&todos, Some(9)).is_empty());
        assert!(filter_todos(&[], Some(1)).is_empty());
    }

    #[test]
    fn sequence_only_accepts_latest_ticket() {
        let mut seq = Sequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
