use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use super::actions::{apply_action, ActionDispatcher, SessionAction, SessionCommand};
use super::Session;
use crate::api::{ChatApi, ChatRequest};
use crate::core::store::{self, Store};

/// Applies session commands against a store and a chat service.
///
/// Without a dispatcher, network commands are awaited inline and their
/// results applied before [`SessionRuntime::dispatch`] returns, which suits
/// one-shot commands. With a dispatcher, they run on spawned tasks and
/// report back through the action channel so an event loop stays responsive.
pub struct SessionRuntime<S, A> {
    session: Session,
    store: S,
    api: Arc<A>,
    dispatcher: Option<ActionDispatcher>,
}

impl<S, A> SessionRuntime<S, A>
where
    S: Store,
    A: ChatApi + 'static,
{
    pub fn new(store: S, api: A) -> Self {
        Self {
            session: Session::new(),
            store,
            api: Arc::new(api),
            dispatcher: None,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: ActionDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Restore persisted state and probe the service.
    pub async fn start(&mut self) {
        self.load(true).await;
    }

    /// Restore persisted state without touching the network.
    pub async fn restore(&mut self) {
        self.load(false).await;
    }

    async fn load(&mut self, probe_health: bool) {
        let mode = store::load_mode(&self.store);
        let history = store::load_history(&self.store);
        self.dispatch(SessionAction::Initialize {
            mode,
            history,
            probe_health,
        })
        .await;
    }

    pub async fn dispatch(&mut self, action: SessionAction) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            for command in apply_action(&mut self.session, action) {
                if let Some(followup) = self.run_command(command).await {
                    queue.push_back(followup);
                }
            }
        }
    }

    async fn run_command(&mut self, command: SessionCommand) -> Option<SessionAction> {
        match command {
            SessionCommand::PersistHistory(messages) => {
                store::save_history(&mut self.store, &messages)
                    .err()
                    .map(|err| {
                        warn!("failed to save chat history: {err}");
                        SessionAction::PersistFailed {
                            error: err.to_string(),
                        }
                    })
            }
            SessionCommand::PersistMode(mode) => {
                store::save_mode(&mut self.store, mode).err().map(|err| {
                    warn!("failed to save mode: {err}");
                    SessionAction::PersistFailed {
                        error: err.to_string(),
                    }
                })
            }
            SessionCommand::RemoveHistory => match store::remove_history(&mut self.store) {
                Ok(()) => Some(SessionAction::HistoryCleared),
                Err(err) => {
                    warn!("failed to clear chat history: {err}");
                    Some(SessionAction::ClearFailed {
                        error: err.to_string(),
                    })
                }
            },
            SessionCommand::SendChat {
                request_id,
                request,
            } => match &self.dispatcher {
                Some(dispatcher) => {
                    spawn_chat_request(
                        Arc::clone(&self.api),
                        dispatcher.clone(),
                        request_id,
                        request,
                    );
                    None
                }
                None => Some(chat_outcome(self.api.as_ref(), request_id, &request).await),
            },
            SessionCommand::ProbeHealth => match &self.dispatcher {
                Some(dispatcher) => {
                    spawn_health_probe(Arc::clone(&self.api), dispatcher.clone());
                    None
                }
                None => Some(SessionAction::HealthChecked {
                    health: self.api.check_health().await,
                }),
            },
        }
    }
}

async fn chat_outcome<A: ChatApi + ?Sized>(
    api: &A,
    request_id: u64,
    request: &ChatRequest,
) -> SessionAction {
    match api.send_chat(request).await {
        Ok(reply) => SessionAction::ReplyReceived { request_id, reply },
        Err(err) => {
            warn!(request_id, "chat request failed: {err}");
            SessionAction::RequestFailed {
                request_id,
                error: err.to_string(),
            }
        }
    }
}

fn spawn_chat_request<A: ChatApi + 'static>(
    api: Arc<A>,
    dispatcher: ActionDispatcher,
    request_id: u64,
    request: ChatRequest,
) {
    tokio::spawn(async move {
        let action = chat_outcome(api.as_ref(), request_id, &request).await;
        dispatcher.dispatch(action);
    });
}

fn spawn_health_probe<A: ChatApi + 'static>(api: Arc<A>, dispatcher: ActionDispatcher) {
    tokio::spawn(async move {
        let health = api.check_health().await;
        debug!(%health, "health probe finished");
        dispatcher.dispatch(SessionAction::HealthChecked { health });
    });
}
