//! Chat session controller.
//!
//! [`Session`] owns the conversation mode, the transcript, the single
//! in-flight request slot and the status readout. It is driven entirely by
//! [`SessionAction`]s and answers with [`SessionCommand`]s describing the
//! persistence and network work a runtime must carry out. Nothing in this
//! module performs I/O, which keeps every transition unit-testable.

pub mod actions;
pub mod runtime;
pub mod status;


use std::time::Instant;

use tracing::debug;

use crate::api::{ChatRequest, ChatResponse, HealthStatus};
use crate::core::message::{Classification, Message};
use crate::core::mode::Mode;

pub use actions::{apply_action, ActionDispatcher, SessionAction, SessionCommand};
pub use runtime::SessionRuntime;
pub use status::{InputNotice, Status, INPUT_BUDGET, INPUT_WARNING_THRESHOLD};

/// Reply appended when the chat service cannot be reached or answers with
/// an error.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting. Please make sure the backend server is running.";

/// Greeting shown while the transcript is empty. Never persisted.
pub const WELCOME_LINES: [&str; 3] = [
    "Welcome!",
    "I'm here to help answer your questions in a safe and respectful way.",
    "Try asking me anything! I'll keep our conversation appropriate.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlight {
    pub request_id: u64,
    pub started: Instant,
}

/// How the most recent chat request ended. Kept apart from [`Status`],
/// which later storage errors may overwrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exchange {
    Answered { confidence: Option<f64> },
    Failed,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    transcript: Vec<Message>,
    in_flight: Option<InFlight>,
    status: Status,
    connection: Option<HealthStatus>,
    input_notice: Option<InputNotice>,
    clear_pending: bool,
    last_exchange: Option<Exchange>,
    next_request_id: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            transcript: Vec::new(),
            in_flight: None,
            status: Status::Ready,
            connection: None,
            input_notice: None,
            clear_pending: false,
            last_exchange: None,
            next_request_id: 1,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// True while a request is in flight. New submissions are dropped.
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    /// The typing indicator is shown exactly while a request is in flight.
    pub fn shows_pending_reply(&self) -> bool {
        self.is_processing()
    }

    pub fn shows_welcome(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn connection(&self) -> Option<HealthStatus> {
        self.connection
    }

    pub fn input_notice(&self) -> Option<InputNotice> {
        self.input_notice
    }

    pub fn is_clear_pending(&self) -> bool {
        self.clear_pending
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// Outcome of the latest completed request, if any since startup.
    pub fn last_exchange(&self) -> Option<Exchange> {
        self.last_exchange
    }

    pub(crate) fn initialize(
        &mut self,
        mode: Mode,
        history: Vec<Message>,
        probe_health: bool,
    ) -> Vec<SessionCommand> {
        debug!(%mode, messages = history.len(), "initializing session");
        self.mode = mode;
        self.transcript = history;
        self.in_flight = None;
        self.clear_pending = false;
        self.input_notice = None;

        if probe_health {
            self.status = Status::Connecting;
            vec![SessionCommand::ProbeHealth]
        } else {
            self.status = Status::Ready;
            Vec::new()
        }
    }

    pub(crate) fn submit(&mut self, raw_text: &str) -> Vec<SessionCommand> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if let Some(in_flight) = self.in_flight {
            debug!(request_id = in_flight.request_id, "dropping submission while busy");
            self.status = Status::PleaseWait;
            return Vec::new();
        }

        self.transcript.push(Message::user(text));
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight {
            request_id,
            started: Instant::now(),
        });
        self.status = Status::Thinking;
        self.input_notice = None;

        vec![
            self.persist_history(),
            SessionCommand::SendChat {
                request_id,
                request: ChatRequest {
                    message: text.to_string(),
                    mode: self.mode,
                },
            },
        ]
    }

    pub(crate) fn complete_with_reply(
        &mut self,
        request_id: u64,
        reply: ChatResponse,
    ) -> Vec<SessionCommand> {
        if !self.release(request_id) {
            return Vec::new();
        }
        self.transcript
            .push(Message::bot(reply.reply, reply.classification));
        self.last_exchange = Some(Exchange::Answered {
            confidence: reply.confidence,
        });
        self.status = Status::Ready;
        vec![self.persist_history()]
    }

    pub(crate) fn complete_with_failure(
        &mut self,
        request_id: u64,
        error: &str,
    ) -> Vec<SessionCommand> {
        if !self.release(request_id) {
            return Vec::new();
        }
        debug!(request_id, error, "chat request failed");
        self.transcript
            .push(Message::bot(FALLBACK_REPLY, Classification::Irrelevant));
        self.last_exchange = Some(Exchange::Failed);
        self.status = Status::Error;
        vec![self.persist_history()]
    }

    pub(crate) fn record_health(&mut self, health: HealthStatus) {
        self.connection = Some(health);
        // A request that started before the probe finished owns the readout.
        if !self.is_processing() {
            self.status = Status::from_health(health);
        }
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) -> Vec<SessionCommand> {
        self.mode = mode;
        self.status = Status::ModeChanged(mode);
        vec![SessionCommand::PersistMode(mode)]
    }

    pub(crate) fn request_clear(&mut self) {
        self.clear_pending = true;
    }

    /// The transcript is only reset once the store reports the removal via
    /// [`SessionAction::HistoryCleared`].
    pub(crate) fn confirm_clear(&mut self) -> Vec<SessionCommand> {
        if !std::mem::take(&mut self.clear_pending) {
            return Vec::new();
        }
        vec![SessionCommand::RemoveHistory]
    }

    pub(crate) fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    pub(crate) fn finish_clear(&mut self) {
        self.transcript.clear();
        self.status = Status::HistoryCleared;
    }

    pub(crate) fn record_storage_error(&mut self, error: String) {
        self.status = Status::StorageError(error);
    }

    pub(crate) fn on_input_changed(&mut self, length: usize) {
        self.input_notice = InputNotice::for_length(length);
    }

    fn release(&mut self, request_id: u64) -> bool {
        match self.in_flight {
            Some(in_flight) if in_flight.request_id == request_id => {
                self.in_flight = None;
                true
            }
            _ => {
                debug!(request_id, "ignoring completion for a request that is not in flight");
                false
            }
        }
    }

    fn persist_history(&self) -> SessionCommand {
        SessionCommand::PersistHistory(self.transcript.clone())
    }
}
