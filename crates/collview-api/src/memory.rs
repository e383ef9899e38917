use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use collview_core::error::CollviewError;
use collview_core::models::collection::{Collection, CollectionDraft};

use crate::Transport;

const ROOT: &str = "/collections/";

/// A scripted failure returned by [`MemoryTransport`] instead of the next
/// normal response.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The request never completed.
    Network(String),
    /// The server answered with a non-success status.
    Status(u16, String),
    /// The server answered 200 with this body.
    Body(Value),
}

impl Failure {
    fn into_result(self) -> Result<Value, CollviewError> {
        match self {
            Failure::Network(message) => Err(CollviewError::Network { message }),
            Failure::Status(status, message) => Err(CollviewError::Http { status, message }),
            Failure::Body(body) => Ok(body),
        }
    }
}

#[derive(Default)]
struct State {
    collections: Vec<Collection>,
    calls: Vec<String>,
    failures: VecDeque<Failure>,
}

/// In-process fake of the `/collections/` API.
///
/// Assigns ids and timestamps on create the way the backend does, keeps
/// list order stable, and records every call so tests can count requests.
/// A gated transport holds each call until [`MemoryTransport::release`]
/// hands out a permit.
pub struct MemoryTransport {
    state: Mutex<State>,
    gate: Option<Arc<Semaphore>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            gate: None,
        }
    }

    pub fn with_collections(collections: Vec<Collection>) -> Self {
        let transport = Self::new();
        transport.lock().collections = collections;
        transport
    }

    /// Calls block until released.
    pub fn gated(self) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..self
        }
    }

    /// Let `n` blocked or future calls through a gated transport.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Make the next call fail (or answer) with `failure`. Failures queue up.
    pub fn fail_next(&self, failure: Failure) {
        self.lock().failures.push_back(failure);
    }

    /// Every call made so far, as `"METHOD path"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        let prefix = format!("{method} ");
        self.lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.lock().collections.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wait for the gate, log the call and pop any scripted failure.
    async fn begin(&self, method: &str, path: &str) -> Option<Failure> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        let mut state = self.lock();
        state.calls.push(format!("{method} {path}"));
        state.failures.pop_front()
    }

    fn handle(&self, method: &str, path: &str, body: Option<&Value>) -> Result<Value, CollviewError> {
        let mut state = self.lock();
        let target = route(path)?;

        match (method, target) {
            ("GET", None) => to_value(&state.collections),
            ("GET", Some(id)) => state
                .collections
                .iter()
                .find(|c| c.id == id)
                .map(to_value)
                .unwrap_or_else(|| Err(not_found())),
            ("POST", None) => {
                let draft = parse_draft(body)?;
                let name = draft.name.ok_or_else(|| CollviewError::Http {
                    status: 422,
                    message: "name is required".to_string(),
                })?;
                let now = timestamp();
                let created = Collection {
                    id: uuid::Uuid::new_v4().to_string(),
                    name,
                    description: draft.description.unwrap_or_default(),
                    color: draft.color.unwrap_or_else(|| "#3b82f6".to_string()),
                    created_at: now.clone(),
                    updated_at: now,
                    document_count: 0,
                    chat_session_count: None,
                };
                state.collections.push(created.clone());
                to_value(&created)
            }
            ("PUT", Some(id)) => {
                let draft = parse_draft(body)?;
                let existing = state
                    .collections
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(not_found)?;
                if let Some(name) = draft.name {
                    existing.name = name;
                }
                if let Some(description) = draft.description {
                    existing.description = description;
                }
                if let Some(color) = draft.color {
                    existing.color = color;
                }
                existing.updated_at = timestamp();
                to_value(&*existing)
            }
            ("DELETE", Some(id)) => {
                let before = state.collections.len();
                state.collections.retain(|c| c.id != id);
                if state.collections.len() == before {
                    return Err(not_found());
                }
                Ok(Value::Null)
            }
            _ => Err(CollviewError::Http {
                status: 405,
                message: "Method Not Allowed".to_string(),
            }),
        }
    }

    async fn call(&self, method: &str, path: &str, body: Option<&Value>) -> Result<Value, CollviewError> {
        if let Some(failure) = self.begin(method, path).await {
            return failure.into_result();
        }
        self.handle(method, path, body)
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// `None` for the collection root, `Some(id)` for a single collection.
fn route(path: &str) -> Result<Option<&str>, CollviewError> {
    match path.strip_prefix(ROOT) {
        Some("") => Ok(None),
        Some(id) if !id.contains('/') => Ok(Some(id)),
        _ => Err(CollviewError::Http {
            status: 404,
            message: "Not Found".to_string(),
        }),
    }
}

fn not_found() -> CollviewError {
    CollviewError::Http {
        status: 404,
        message: "Collection not found".to_string(),
    }
}

fn parse_draft(body: Option<&Value>) -> Result<CollectionDraft, CollviewError> {
    let body = body.cloned().unwrap_or_else(|| json!({}));
    serde_json::from_value(body).map_err(|e| CollviewError::Http {
        status: 422,
        message: e.to_string(),
    })
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, CollviewError> {
    serde_json::to_value(value).map_err(|e| CollviewError::Serialization(e.to_string()))
}

fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, path: &str) -> Result<Value, CollviewError> {
        self.call("GET", path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CollviewError> {
        self.call("POST", path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, CollviewError> {
        self.call("PUT", path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), CollviewError> {
        self.call("DELETE", path, None).await.map(|_| ())
    }
}
