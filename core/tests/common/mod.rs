//! Shared fixtures: a scripted in-memory transport, entity builders, a
//! tracing layer that captures log lines, and a live mock server.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;
use taskboard_core::{ApiError, HttpRequest, HttpResponse, Project, Todo, Transport};

struct Reply {
    response: Result<HttpResponse, String>,
    gate: Option<Arc<Notify>>,
}

/// Answers requests from per-URL queues and records every request it sees.
///
/// A reply can be held back behind a gate; the request is recorded
/// immediately and the response is released when the gate is opened.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.push(url, Ok(response(status, body.into())), None);
    }

    pub fn respond_json<T: serde::Serialize>(&self, url: &str, status: u16, value: &T) {
        self.respond(url, status, serde_json::to_string(value).unwrap());
    }

    /// Queues a JSON reply that is only delivered once the returned gate is
    /// notified.
    pub fn respond_json_gated<T: serde::Serialize>(
        &self,
        url: &str,
        status: u16,
        value: &T,
    ) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(
            url,
            Ok(response(status, serde_json::to_string(value).unwrap())),
            Some(Arc::clone(&gate)),
        );
        gate
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.push(url, Err(message.to_string()), None);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, url: &str, response: Result<HttpResponse, String>, gate: Option<Arc<Notify>>) {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Reply { response, gate });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front);
        self.requests.lock().unwrap().push(request.clone());

        let Some(reply) = reply else {
            panic!("no scripted reply for {} {}", request.method, request.path);
        };
        if let Some(gate) = reply.gate {
            gate.notified().await;
        }
        reply.response.map_err(ApiError::Transport)
    }
}

fn response(status: u16, body: String) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Yields to the runtime until the transport has seen `n` requests.
pub async fn wait_for_requests(transport: &ScriptedTransport, n: usize) {
    while transport.request_count() < n {
        tokio::task::yield_now().await;
    }
}

pub fn todo(id: u64, project_id: u64) -> Todo {
    Todo {
        id,
        title: format!("todo {id}"),
        description: format!("description of {id}"),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        project_id,
        tag_ids: vec![1],
        priority: None,
        due_date: None,
        completed: false,
    }
}

pub fn project(id: u64, name: &str) -> Project {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    Project {
        id,
        name: name.to_string(),
        description: format!("{name} tasks"),
        created_at: at,
        updated_at: at,
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// A tracing layer that records `[LEVEL] message field=value ...` lines.
#[derive(Clone, Default)]
pub struct LogCapture {
    pub logs: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
    pub fn lines(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        struct Visitor {
            line: String,
        }

        impl tracing::field::Visit for Visitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.line.push_str(&format!(" {value:?}"));
                } else {
                    self.line.push_str(&format!(" {}={value:?}", field.name()));
                }
            }
        }

        let mut visitor = Visitor {
            line: format!("[{}]", event.metadata().level()),
        };
        event.record(&mut visitor);
        self.logs.lock().unwrap().push(visitor.line);
    }
}

// ---------------------------------------------------------------------------
// Live server
// ---------------------------------------------------------------------------

/// Starts the mock server with `store` on a random port and returns its base
/// URL.
pub async fn spawn_server(store: mock_server::Store) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run_with(listener, store).await });
    format!("http://{addr}")
}
