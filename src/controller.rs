//! Interaction controller: the Idle / AwaitingReply state machine.
//!
//! Every transcript write goes through this type. At most one completion is
//! in flight; a submit while one is pending is ignored here, whatever the UI
//! does.

use tokio::sync::oneshot;

use crate::llm::{CompletionClient, ProviderError, ProviderResult};
use crate::message::Message;
use crate::persona::PromptCatalog;
use crate::store::ConversationStore;

/// Prefix of the transcript entry written when a completion fails.
pub const ERROR_PREFIX: &str = "Sorry, there was an error processing your request: ";

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingReply,
}

/// Everything a single completion call needs, captured at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub persona: String,
    /// Transcript as it was before the new user message was appended.
    pub history: Vec<Message>,
    pub user_text: String,
}

/// Owns the transcript and drives one request at a time.
pub struct Controller {
    store: ConversationStore,
    client: CompletionClient,
    persona: String,
    state: ControllerState,
    /// Persona of the request in flight; labels its reply.
    pending_persona: Option<String>,
    reply_rx: Option<oneshot::Receiver<ProviderResult<String>>>,
}

impl Controller {
    /// Create an idle controller with an empty transcript and the catalog's
    /// default persona selected.
    pub fn new(client: CompletionClient) -> Self {
        let persona = client.catalog().default_persona().to_string();
        Self {
            store: ConversationStore::new(),
            client,
            persona,
            state: ControllerState::Idle,
            pending_persona: None,
            reply_rx: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// True while a reply is awaited.
    pub fn is_busy(&self) -> bool {
        self.state == ControllerState::AwaitingReply
    }

    pub fn transcript(&self) -> &[Message] {
        self.store.all()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Currently selected persona.
    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn catalog(&self) -> &PromptCatalog {
        self.client.catalog()
    }

    /// Persona names available for selection.
    pub fn personas(&self) -> Vec<&str> {
        self.catalog().names().collect()
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Select a persona. Refused while busy or for names outside the catalog.
    pub fn set_persona(&mut self, name: &str) -> bool {
        if self.is_busy() || !self.catalog().contains(name) {
            return false;
        }
        if self.persona != name {
            tracing::info!(from = %self.persona, to = name, "persona changed");
            self.persona = name.to_string();
        }
        true
    }

    /// Idle -> AwaitingReply.
    ///
    /// Appends the user message and returns the context to send, or `None`
    /// when `text` is blank or a reply is already pending.
    ///
    /// No request is dispatched: the caller runs the completion itself and
    /// must settle the turn with [`Controller::finish_turn`]. `poll_reply` and
    /// `wait_reply` only settle turns started by [`Controller::submit`].
    pub fn begin_turn(&mut self, text: &str) -> Option<RequestContext> {
        if text.trim().is_empty() {
            return None;
        }
        if self.is_busy() {
            tracing::debug!("submit ignored while awaiting reply");
            return None;
        }

        let context = RequestContext {
            persona: self.persona.clone(),
            history: self.store.all().to_vec(),
            user_text: text.to_string(),
        };

        self.store.append(Message::user(text));
        self.pending_persona = Some(context.persona.clone());
        self.state = ControllerState::AwaitingReply;
        Some(context)
    }

    /// AwaitingReply -> Idle.
    ///
    /// Records the reply, or the failure as an assistant message. Ignored when
    /// nothing is pending.
    pub fn finish_turn(&mut self, result: ProviderResult<String>) {
        if !self.is_busy() {
            return;
        }

        let persona = self
            .pending_persona
            .take()
            .unwrap_or_else(|| self.persona.clone());

        let content = match result {
            Ok(reply) => reply,
            Err(e) => format!("{}{}", ERROR_PREFIX, e.reason()),
        };

        self.store.append(Message::assistant(content, persona));
        self.state = ControllerState::Idle;
    }

    /// Begin a turn and run the completion on the tokio runtime.
    ///
    /// Returns whether a request was dispatched. Must be called from within a
    /// runtime.
    pub fn submit(&mut self, text: &str) -> bool {
        let Some(context) = self.begin_turn(text) else {
            return false;
        };

        let client = self.client.clone();
        let (tx, rx) = oneshot::channel();
        self.reply_rx = Some(rx);

        tokio::spawn(async move {
            let result = client
                .complete(&context.persona, &context.history, &context.user_text)
                .await;
            let _ = tx.send(result);
        });

        true
    }

    /// Settle the pending request if its result has arrived, without blocking.
    ///
    /// Returns true if a turn was finished.
    pub fn poll_reply(&mut self) -> bool {
        let Some(mut rx) = self.reply_rx.take() else {
            return false;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.finish_turn(result);
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => {
                self.reply_rx = Some(rx);
                false
            }
            Err(oneshot::error::TryRecvError::Closed) => {
                self.finish_turn(Err(closed_channel()));
                true
            }
        }
    }

    /// Wait for the pending request and settle it.
    ///
    /// Returns false if nothing was pending.
    pub async fn wait_reply(&mut self) -> bool {
        let Some(rx) = self.reply_rx.take() else {
            return false;
        };

        let result = rx.await.unwrap_or_else(|_| Err(closed_channel()));
        self.finish_turn(result);
        true
    }
}

fn closed_channel() -> ProviderError {
    ProviderError::Transport("completion task ended without a result".to_string())
}
