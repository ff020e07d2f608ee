//! Groq provider.
//!
//! Groq serves an OpenAI-compatible chat-completions API. One POST is made per
//! turn and the full reply is read before returning.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ChatMessage, LlmConfig, LlmProvider, ProviderError, ProviderResult};

/// Default Groq API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default Groq model.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Groq chat-completion provider.
pub struct GroqProvider {
    client: Client,
    config: Arc<LlmConfig>,
}

impl GroqProvider {
    /// Create a new Groq provider with the given configuration.
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Get the API base URL.
    fn api_base(&self) -> &str {
        if self.config.api_base.is_empty() {
            DEFAULT_API_BASE
        } else {
            &self.config.api_base
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base().trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn display_name(&self) -> &str {
        "Groq"
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> ProviderResult<String> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "set {} or add api_key to the [llm] section of the config file",
                API_KEY_ENV
            )));
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.endpoint();
        tracing::debug!(%url, messages = messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %body, "completion request rejected");
            return Err(api_error(status.as_u16(), &body));
        }

        extract_reply(&body)
    }
}

/// Chat-completion request body (OpenAI-compatible).
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_reply(body: &str) -> ProviderResult<String> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|_| ProviderError::MalformedResponse)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or(ProviderError::MalformedResponse)
}

/// Build an API error, preferring the provider's own message when present.
fn api_error(status: u16, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) => resp.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.to_string(),
    };
    ProviderError::Api {
        status,
        message,
        body: body.to_string(),
    }
}
