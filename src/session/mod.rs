/// Session management module - Gateway

mod conversation;
mod suggestions;

pub use conversation::{
    fallback_message, Exchange, RejectReason, Session, SessionEvent, SessionObserver, SubmitOutcome,
};
pub use suggestions::{Suggestion, SUGGESTIONS};
