pub mod app;
pub mod cli;
pub mod constants;
pub mod models;
pub mod runtime;
pub mod session;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use models::{AssistantService, ChatMessage, HttpAssistant, MessageRole};
pub use session::{Session, SessionEvent, SubmitOutcome};
pub use utils::AppError;
