//! LLM client module for API interactions.
//!
//! [`CompletionClient`] turns a persona, the prior transcript and the new user
//! text into one provider call. The provider itself sits behind
//! [`LlmProvider`] so it can be replaced in tests.

mod groq;
mod provider;

pub use groq::{GroqProvider, API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use provider::{LlmProvider, ProviderError, ProviderResult};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::message::Message;
use crate::persona::PromptCatalog;

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "GROQ_API_BASE";

/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "GROQ_MODEL";

/// Chat message for API requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self::new(msg.role.as_api_str(), msg.content.clone())
    }
}

/// Build the ordered request sequence: system prompt, history, new user text.
pub fn build_request_messages(
    system_prompt: &str,
    history: &[Message],
    user_text: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(user_text));
    messages
}

/// LLM client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl LlmConfig {
    /// Check if the client is configured with an API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Load from environment variables, with file config as fallback.
    pub fn from_env_and_config(file_config: Option<&crate::config::LlmConfigFile>) -> Self {
        Self::from_config_with_env(file_config, |name| std::env::var(name).ok())
    }

    /// Same as [`LlmConfig::from_env_and_config`], reading variables through `env`.
    pub fn from_config_with_env(
        file_config: Option<&crate::config::LlmConfigFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::default();

        // First apply file config if present
        if let Some(fc) = file_config {
            config.api_base = fc.api_base.clone();
            if let Some(ref key) = fc.api_key {
                config.api_key = key.clone();
            }
            config.model = fc.model.clone();
            config.temperature = fc.temperature;
            config.max_tokens = fc.max_tokens;
        }

        // Environment variables override file config
        if let Some(key) = env(API_KEY_ENV).filter(|v| !v.is_empty()) {
            config.api_key = key;
        }
        if let Some(base) = env(API_BASE_ENV).filter(|v| !v.is_empty()) {
            config.api_base = base;
        }
        if let Some(model) = env(MODEL_ENV).filter(|v| !v.is_empty()) {
            config.model = model;
        }

        config
    }
}

/// Completion client: prompt construction plus one provider call per turn.
#[derive(Clone)]
pub struct CompletionClient {
    inner: Arc<dyn LlmProvider>,
    catalog: Arc<PromptCatalog>,
}

impl CompletionClient {
    /// Create a client backed by Groq.
    pub fn new(config: LlmConfig, catalog: Arc<PromptCatalog>) -> Self {
        Self::from_provider(Arc::new(GroqProvider::new(config)), catalog)
    }

    /// Create a client from an existing provider.
    pub fn from_provider(provider: Arc<dyn LlmProvider>, catalog: Arc<PromptCatalog>) -> Self {
        Self {
            inner: provider,
            catalog,
        }
    }

    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.inner.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    /// Ask the provider for the next assistant reply.
    ///
    /// `history` is the transcript before `user_text` was entered; the new
    /// text is sent as the trailing user message.
    pub async fn complete(
        &self,
        persona: &str,
        history: &[Message],
        user_text: &str,
    ) -> ProviderResult<String> {
        let messages =
            build_request_messages(self.catalog.prompt_for(persona), history, user_text);

        tracing::info!(
            persona,
            model = self.inner.model(),
            messages = messages.len(),
            "requesting completion"
        );

        let result = self.inner.complete(messages).await;
        if let Err(ref e) = result {
            tracing::warn!(persona, error = %e, "completion failed");
        }
        result
    }
}
