use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use super::suggestions::{Suggestion, SUGGESTIONS};
use crate::constants::{FALLBACK_PREFIX, GREETING};
use crate::models::{AssistantService, ChatMessage};
use crate::utils::AppError;

/// Something observers may want to redraw for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended(ChatMessage),
    InFlightChanged(bool),
    InputChanged(String),
}

/// Callback invoked synchronously for every session event
pub type SessionObserver = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Empty or whitespace-only text
    Blank,
    /// A request is already outstanding
    Busy,
    /// The exchange was started by another session
    Foreign,
}

/// Result of a call to [`Session::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(RejectReason),
    /// The assistant's reply was appended
    Replied,
    /// The service could not be reached; the fallback message was appended
    FellBack,
}

/// An accepted submission waiting for the service. Only [`Session::begin`]
/// creates one and [`Session::complete`] consumes it, so every accepted user
/// message gets exactly one answer.
#[derive(Debug)]
pub struct Exchange {
    session_id: u64,
    message: String,
    history: Vec<ChatMessage>,
}

impl Exchange {
    /// The new user message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Transcript as it was before the user message
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Send this exchange to the service
    pub async fn send(&self, service: &dyn AssistantService) -> Result<String, AppError> {
        service.reply(&self.message, &self.history).await
    }
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// A single conversation: the transcript, the text being typed and the
/// in-flight guard.
pub struct Session {
    id: u64,
    transcript: Vec<ChatMessage>,
    pending_input: String,
    in_flight: bool,
    fallback: String,
    observers: Vec<SessionObserver>,
}

impl Session {
    /// Start a conversation seeded with `greeting`. `fallback` is appended
    /// whenever the service cannot be reached.
    pub fn new(greeting: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            transcript: vec![ChatMessage::assistant(greeting)],
            pending_input: String::new(),
            in_flight: false,
            fallback: fallback.into(),
            observers: Vec::new(),
        }
    }

    /// Start a conversation with the stock greeting, pointing users at
    /// `service_url` when it is unreachable
    pub fn for_service(service_url: &str) -> Self {
        Self::new(GREETING, fallback_message(service_url))
    }

    pub fn subscribe(&mut self, observer: SessionObserver) {
        self.observers.push(observer);
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback
    }

    /// True until the first user message is appended
    pub fn is_initial(&self) -> bool {
        self.transcript.len() <= 1
    }

    /// Suggestions on offer; empty once the conversation has started
    pub fn suggestions(&self) -> &'static [Suggestion] {
        if self.is_initial() {
            SUGGESTIONS
        } else {
            &[]
        }
    }

    /// Replace the text being typed
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
        self.notify(SessionEvent::InputChanged(self.pending_input.clone()));
    }

    /// Edit the text being typed in place
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.pending_input);
        self.notify(SessionEvent::InputChanged(self.pending_input.clone()));
    }

    /// Put a canned prompt into the input without sending it. Returns false
    /// when the conversation is past its initial state.
    pub fn select_suggestion(&mut self, prompt: &str) -> bool {
        if !self.is_initial() {
            debug!("suggestion ignored: conversation already started");
            return false;
        }
        self.set_input(prompt);
        true
    }

    /// Accept `text` as the next user message: append it, raise the
    /// in-flight flag and return the request to send.
    pub fn begin(&mut self, text: &str) -> Result<Exchange, RejectReason> {
        let message = text.trim();
        if message.is_empty() {
            return Err(RejectReason::Blank);
        }
        if self.in_flight {
            debug!("submission rejected: request already in flight");
            return Err(RejectReason::Busy);
        }

        let history = self.transcript.clone();
        self.append(ChatMessage::user(message));
        self.set_in_flight(true);
        info!(history = history.len(), "message accepted");

        Ok(Exchange {
            session_id: self.id,
            message: message.to_string(),
            history,
        })
    }

    /// Like [`Session::begin`] with the pending input, which is cleared on
    /// acceptance
    pub fn begin_pending(&mut self) -> Result<Exchange, RejectReason> {
        let text = self.pending_input.clone();
        let exchange = self.begin(&text)?;
        self.set_input(String::new());
        Ok(exchange)
    }

    /// Record the service's answer for `exchange` and drop the in-flight flag,
    /// whatever the result. An exchange begun by another session is refused
    /// and leaves this one untouched.
    pub fn complete(
        &mut self,
        exchange: Exchange,
        result: Result<String, AppError>,
    ) -> SubmitOutcome {
        if exchange.session_id != self.id {
            warn!(
                session = self.id,
                owner = exchange.session_id,
                "exchange completed on the wrong session"
            );
            return SubmitOutcome::Rejected(RejectReason::Foreign);
        }

        let outcome = match result {
            Ok(reply) => {
                self.append(ChatMessage::assistant(reply));
                SubmitOutcome::Replied
            }
            Err(err) => {
                warn!(error = %err, message = %exchange.message, "assistant unreachable");
                self.append(ChatMessage::assistant(self.fallback.clone()));
                SubmitOutcome::FellBack
            }
        };
        self.set_in_flight(false);
        outcome
    }

    /// Run a whole exchange: accept, ask the service, record the answer
    pub async fn submit(&mut self, text: &str, service: &dyn AssistantService) -> SubmitOutcome {
        match self.begin(text) {
            Ok(exchange) => {
                let result = exchange.send(service).await;
                self.complete(exchange, result)
            }
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }

    /// Submit whatever is in the input box
    pub async fn submit_pending(&mut self, service: &dyn AssistantService) -> SubmitOutcome {
        match self.begin_pending() {
            Ok(exchange) => {
                let result = exchange.send(service).await;
                self.complete(exchange, result)
            }
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }

    fn append(&mut self, message: ChatMessage) {
        self.transcript.push(message.clone());
        self.notify(SessionEvent::MessageAppended(message));
    }

    fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
        self.notify(SessionEvent::InFlightChanged(in_flight));
    }

    fn notify(&self, event: SessionEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }
}

/// The message shown in place of a reply when the service is unreachable
pub fn fallback_message(service_url: &str) -> String {
    format!("{} {}", FALLBACK_PREFIX, service_url)
}
