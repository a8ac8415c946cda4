use async_trait::async_trait;

use super::types::ChatMessage;
use crate::utils::AppError;

/// The remote collaborator that turns a conversation into reply text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Send the new user message along with everything said before it.
    /// Any failure is reported as `AppError::AssistantUnreachable`.
    async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, AppError>;
}
