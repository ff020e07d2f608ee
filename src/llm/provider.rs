//! LLM Provider trait for swappable completion backends.
//!
//! The production backend is [`GroqProvider`](super::GroqProvider); tests plug
//! in scripted providers through the same trait.

use async_trait::async_trait;
use thiserror::Error;

use super::ChatMessage;

/// Trait for chat-completion providers.
///
/// # Example
///
/// ```ignore
/// use rolechat::llm::{ChatMessage, LlmProvider};
///
/// async fn ask(provider: &dyn LlmProvider) {
///     let messages = vec![ChatMessage::user("Hello!")];
///     match provider.complete(messages).await {
///         Ok(reply) => println!("{reply}"),
///         Err(e) => eprintln!("{}", e.reason()),
///     }
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the model identifier sent with every request.
    fn model(&self) -> &str;

    /// Returns whether the provider has what it needs to make a request.
    fn is_configured(&self) -> bool;

    /// Returns the display name for this provider instance.
    fn display_name(&self) -> &str;

    /// Send one chat-completion request and wait for the whole reply.
    ///
    /// `messages` is sent exactly as given, in order.
    async fn complete(&self, messages: Vec<ChatMessage>) -> ProviderResult<String>;
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider is not configured (missing API key, etc.)
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The request never got an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    ///
    /// `message` is `error.message` from the payload when present, otherwise
    /// the body itself; `body` is the raw payload.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// The response did not carry `choices[0].message.content`.
    #[error("malformed response")]
    MalformedResponse,
}

impl ProviderError {
    /// Human-readable failure reason. Never empty.
    pub fn reason(&self) -> String {
        let reason = self.to_string();
        if reason.trim().is_empty() {
            "unknown error".to_string()
        } else {
            reason
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport("Request timed out".to_string())
        } else if err.is_connect() {
            Self::Transport(format!("Connection failed: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
