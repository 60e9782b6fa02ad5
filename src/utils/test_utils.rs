use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, ChatApi, ChatRequest, ChatResponse, HealthStatus};
use crate::core::message::Classification;
use crate::core::session::{SessionAction, SessionRuntime};
use crate::core::store::{MemoryStore, Store, StoreError};

/// What the scripted service answers for the next chat request.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Reply(ChatResponse),
    Status(u16),
    Malformed,
}

/// A [`ChatApi`] that replays queued answers and records every request.
///
/// When the queue is empty the request fails with a decode error, which the
/// session treats like any other failure.
#[derive(Clone)]
pub struct ScriptedApi {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    health: HealthStatus,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            health: HealthStatus::Connected,
        }
    }

    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    pub fn reply(self, text: &str, classification: Option<Classification>) -> Self {
        self.push(ScriptedReply::Reply(chat_response(text, classification)))
    }

    pub fn push(self, reply: ScriptedReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatApi for ScriptedApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(ScriptedReply::Reply(reply)) => Ok(reply),
            Some(ScriptedReply::Status(status)) => Err(ApiError::Status {
                status,
                body: String::new(),
            }),
            Some(ScriptedReply::Malformed) | None => {
                Err(serde_json::from_str::<ChatResponse>("unreachable").unwrap_err().into())
            }
        }
    }

    async fn check_health(&self) -> HealthStatus {
        self.health
    }
}

/// A store whose writes and removals always fail; reads delegate to an
/// inner [`MemoryStore`].
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner }
    }

    fn denied(key: &str) -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, format!("{key} is locked"))
    }
}

impl Store for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            key: key.to_string(),
            path: key.into(),
            source: Self::denied(key),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Err(StoreError::Remove {
            key: key.to_string(),
            path: key.into(),
            source: Self::denied(key),
        })
    }
}

pub fn chat_response(text: &str, classification: Option<Classification>) -> ChatResponse {
    ChatResponse {
        reply: text.to_string(),
        classification: classification.unwrap_or_default(),
        confidence: None,
    }
}

/// An inline runtime over a fresh in-memory store.
pub async fn create_test_runtime(api: ScriptedApi) -> SessionRuntime<MemoryStore, ScriptedApi> {
    create_test_runtime_with_store(MemoryStore::new(), api).await
}

pub async fn create_test_runtime_with_store<S: Store>(
    store: S,
    api: ScriptedApi,
) -> SessionRuntime<S, ScriptedApi> {
    let mut runtime = SessionRuntime::new(store, api);
    runtime.start().await;
    runtime
}

pub fn submit(text: &str) -> SessionAction {
    SessionAction::Submit {
        text: text.to_string(),
    }
}
