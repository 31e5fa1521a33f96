// ABOUTME: Defines the LlmClient trait - the abstraction layer that allows
// ABOUTME: the runtime to work with any chat-completions provider.

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse};
use crate::error::LlmError;

/// Trait for LLM client implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Create a chat completion for the given request.
    async fn create_chat(&self, req: &ChatRequest) -> Result<ChatResponse, LlmError>;
}
