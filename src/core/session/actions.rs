use tokio::sync::mpsc;

use super::Session;
use crate::api::{ChatRequest, ChatResponse, HealthStatus};
use crate::core::message::Message;
use crate::core::mode::Mode;

/// Everything that can change session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Initialize {
        mode: Mode,
        history: Vec<Message>,
        probe_health: bool,
    },
    Submit {
        text: String,
    },
    ReplyReceived {
        request_id: u64,
        reply: ChatResponse,
    },
    RequestFailed {
        request_id: u64,
        error: String,
    },
    HealthChecked {
        health: HealthStatus,
    },
    SetMode {
        mode: Mode,
    },
    ToggleMode,
    RequestClear,
    ConfirmClear,
    CancelClear,
    HistoryCleared,
    ClearFailed {
        error: String,
    },
    PersistFailed {
        error: String,
    },
    InputChanged {
        length: usize,
    },
}

/// Side effects requested by the session. The controller never performs I/O
/// itself; a runtime applies these and reports back with further actions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SendChat {
        request_id: u64,
        request: ChatRequest,
    },
    ProbeHealth,
    PersistHistory(Vec<Message>),
    PersistMode(Mode),
    RemoveHistory,
}

/// Feeds actions from background tasks back into the event loop.
#[derive(Clone, Debug)]
pub struct ActionDispatcher {
    tx: mpsc::UnboundedSender<SessionAction>,
}

impl ActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<SessionAction>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn dispatch(&self, action: SessionAction) {
        let _ = self.tx.send(action);
    }
}

pub fn apply_action(session: &mut Session, action: SessionAction) -> Vec<SessionCommand> {
    match action {
        SessionAction::Initialize {
            mode,
            history,
            probe_health,
        } => session.initialize(mode, history, probe_health),
        SessionAction::Submit { text } => session.submit(&text),
        SessionAction::ReplyReceived { request_id, reply } => {
            session.complete_with_reply(request_id, reply)
        }
        SessionAction::RequestFailed { request_id, error } => {
            session.complete_with_failure(request_id, &error)
        }
        SessionAction::HealthChecked { health } => {
            session.record_health(health);
            Vec::new()
        }
        SessionAction::SetMode { mode } => session.set_mode(mode),
        SessionAction::ToggleMode => session.set_mode(session.mode().toggled()),
        SessionAction::RequestClear => {
            session.request_clear();
            Vec::new()
        }
        SessionAction::ConfirmClear => session.confirm_clear(),
        SessionAction::CancelClear => {
            session.cancel_clear();
            Vec::new()
        }
        SessionAction::HistoryCleared => {
            session.finish_clear();
            Vec::new()
        }
        SessionAction::ClearFailed { error } | SessionAction::PersistFailed { error } => {
            session.record_storage_error(error);
            Vec::new()
        }
        SessionAction::InputChanged { length } => {
            session.on_input_changed(length);
            Vec::new()
        }
    }
}
