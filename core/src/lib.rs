//! Client-side data layer for the taskboard API.
//!
//! # Overview
//! Three layers, leaves first:
//! - **Transport**: executes plain-data `HttpRequest`s (`HttpTransport` uses
//!   reqwest).
//! - **Accessors** (`Api`): one async function per remote operation, each
//!   building a request with `ApiClient`, executing it, and parsing the
//!   response.
//! - **Store** (`TodoStore`): caches fetched todos and the active project and
//!   derives the todo list filtered by the selected project.
//!
//! # Design
//! - `ApiClient` is stateless and does no I/O, so every wire detail is
//!   testable without a network.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{filter_todos, TodoStore, ALL_PROJECTS};
pub use transport::{HttpTransport, Transport};
pub use types::{NewProject, NewTodo, Project, ProjectId, Tag, TagId, Todo, TodoId, TodoPatch, User, UserId};
