// Gateway module for models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access model functionality
pub use http::HttpAssistant;
#[cfg(test)]
pub use traits::MockAssistantService;
pub use traits::AssistantService;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, FinancialTip, HealthStatus, MessageRole,
};
