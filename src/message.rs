use chrono::Local;

/// Represents who sent a message in the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Returns the role name used on the wire by OpenAI-compatible APIs.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in the chat history.
///
/// Messages are built once and never edited; the transcript only grows.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Persona that produced an assistant reply. Always `None` for user messages.
    pub persona_label: Option<String>,
    /// Local time of creation, formatted for display.
    pub timestamp: String,
}

impl Message {
    /// Create a new user message stamped with the current local time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            persona_label: None,
            timestamp: display_time(),
        }
    }

    /// Create a new assistant message attributed to `persona`.
    pub fn assistant(content: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            persona_label: Some(persona.into()),
            timestamp: display_time(),
        }
    }

    /// Header shown above the message body, e.g. `You - 3:04:05 PM`.
    ///
    /// Assistant messages without a label fall back to `fallback_persona`.
    pub fn header(&self, fallback_persona: &str) -> String {
        let who = match self.role {
            Role::User => "You",
            Role::Assistant => self.persona_label.as_deref().unwrap_or(fallback_persona),
        };
        format!("{} - {}", who, self.timestamp)
    }
}

/// Current local time in 12-hour clock form.
fn display_time() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}
