//! LLM provider trait for answering document questions

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::types::Prompt;

/// Trait for chat-completion backends
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible `/chat/completions` endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the prompt as a single user message and return the raw answer
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
