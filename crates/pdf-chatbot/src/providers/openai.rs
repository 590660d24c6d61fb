//! OpenAI chat-completion client
//!
//! One request per question: no retry, no streaming. The whole round trip is
//! bounded by the configured timeout.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::CompletionError;
use crate::types::Prompt;

use super::llm::LlmProvider;

/// OpenAI-compatible chat-completion client
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(transport_error)?;
            return Err(CompletionError::ProviderError {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("no message content in choices".to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Transport(err.to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        tracing::info!(model = %self.model, prompt_chars = prompt.as_str().len(), "Requesting completion");

        let answer = tokio::time::timeout(self.timeout, self.send(prompt))
            .await
            .map_err(|_| CompletionError::Timeout)??;

        tracing::debug!(answer_chars = answer.len(), "Completion received");
        Ok(answer)
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
