use std::sync::Arc;

use ratatui::widgets::ScrollbarState;

use crate::config::Config;
use crate::controller::Controller;
use crate::llm::{CompletionClient, LlmConfig};
use crate::persona::PromptCatalog;

/// Connection status shown in the chat title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not configured (no API key)
    NotConfigured,
    /// Ready to send messages
    Ready,
    /// Waiting for the provider to answer
    AwaitingReply,
}

/// Input-line state: text and cursor.
#[derive(Debug, Default)]
pub struct ChatState {
    /// Current input text
    pub input: String,
    /// Cursor position in input, counted in characters
    pub cursor_position: usize,
}

impl ChatState {
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Handle a character input.
    pub fn handle_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.cursor_position += 1;
    }

    /// Handle backspace key.
    pub fn handle_backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index();
            self.input.remove(idx);
        }
    }

    /// Move cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_len() {
            self.cursor_position += 1;
        }
    }

    /// Input split around the cursor.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.input.split_at(self.byte_index())
    }

    /// Clear input and reset cursor.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }
}

/// Scroll-related state for the message list.
///
/// `offset` counts rendered lines from the top; `follow` keeps the view
/// pinned to the newest message until the user scrolls up.
#[derive(Debug)]
pub struct ScrollState {
    pub offset: usize,
    pub follow: bool,
    /// Largest offset seen at the last render
    pub max: usize,
    /// Scrollbar state for ratatui
    pub scrollbar: ScrollbarState,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
            max: 0,
            scrollbar: ScrollbarState::default(),
        }
    }
}

impl ScrollState {
    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, max_scroll: usize) {
        if self.offset < max_scroll {
            self.offset += 1;
        }
        self.follow = self.offset >= max_scroll;
    }

    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(page_size);
    }

    pub fn scroll_page_down(&mut self, max_scroll: usize, page_size: usize) {
        self.offset = (self.offset + page_size).min(max_scroll);
        self.follow = self.offset >= max_scroll;
    }

    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    /// Jump to the newest message and keep following.
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }

    /// Clamp to the rendered content and update the scrollbar.
    pub fn update(&mut self, max_scroll: usize) {
        self.max = max_scroll;
        if self.follow || self.offset > max_scroll {
            self.offset = max_scroll;
        }
        self.scrollbar = self.scrollbar.content_length(max_scroll + 1);
        self.scrollbar = self.scrollbar.position(self.offset);
    }
}

/// Persona picker overlay state.
#[derive(Debug, Default)]
pub struct MenuState {
    /// Whether the picker is visible
    pub visible: bool,
    /// Highlighted persona index
    pub selected: usize,
}

impl MenuState {
    /// Open with `current` highlighted.
    pub fn open(&mut self, current: usize) {
        self.visible = true;
        self.selected = current;
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, item_count: usize) {
        if self.selected < item_count.saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.selected = 0;
    }
}

/// Animation-related state for UI effects.
#[derive(Debug)]
pub struct AnimationState {
    /// Cursor blink visibility state
    pub cursor_visible: bool,
    /// Spinner frame while awaiting a reply
    pub spinner_frame: usize,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            cursor_visible: true,
            spinner_frame: 0,
        }
    }
}

impl AnimationState {
    pub fn toggle_cursor(&mut self) {
        self.cursor_visible = !self.cursor_visible;
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

/// Application state for the chat TUI.
pub struct App {
    /// Transcript, persona and request state
    pub controller: Controller,
    /// Input line
    pub chat: ChatState,
    pub scroll: ScrollState,
    /// Persona picker
    pub menu: MenuState,
    pub animation: AnimationState,
}

impl App {
    /// Create an App from config, environment and the Groq provider.
    pub fn new_with_config(config: &Config) -> Self {
        let catalog = match config.catalog() {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "invalid persona table in config, using built-in personas");
                PromptCatalog::builtin()
            }
        };

        let llm_config = LlmConfig::from_env_and_config(Some(&config.llm));
        if !llm_config.is_configured() {
            tracing::warn!("no API key configured");
        }

        let client = CompletionClient::new(llm_config, Arc::new(catalog));
        let mut controller = Controller::new(client);
        if !controller.set_persona(&config.chat.default_persona) {
            tracing::warn!(
                persona = %config.chat.default_persona,
                "configured default persona not found"
            );
        }

        Self::from_controller(controller)
    }

    /// Create an App around an existing controller.
    pub fn from_controller(controller: Controller) -> Self {
        Self {
            controller,
            chat: ChatState::default(),
            scroll: ScrollState::default(),
            menu: MenuState::default(),
            animation: AnimationState::default(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.controller.is_busy() {
            ConnectionStatus::AwaitingReply
        } else if self.controller.client().is_configured() {
            ConnectionStatus::Ready
        } else {
            ConnectionStatus::NotConfigured
        }
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Submit the current input as a message.
    ///
    /// The input is kept if the controller refused it.
    pub fn submit_message(&mut self) {
        if self.controller.submit(&self.chat.input) {
            self.chat.clear_input();
            self.scroll.scroll_to_bottom();
        }
    }

    /// Settle a finished request. Call this in the event loop.
    pub fn process_reply(&mut self) {
        if self.controller.poll_reply() {
            self.scroll.scroll_to_bottom();
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.chat.handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.chat.handle_backspace();
    }

    pub fn move_cursor_left(&mut self) {
        self.chat.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.chat.move_cursor_right();
    }

    /// Open the persona picker. Not available while a reply is pending.
    pub fn open_persona_menu(&mut self) {
        if self.is_busy() {
            return;
        }
        let current = self
            .controller
            .catalog()
            .index_of(self.controller.persona())
            .unwrap_or(0);
        self.menu.open(current);
    }

    pub fn menu_up(&mut self) {
        self.menu.up();
    }

    pub fn menu_down(&mut self) {
        let count = self.controller.catalog().len();
        self.menu.down(count);
    }

    /// Persona highlighted in the picker.
    pub fn selected_persona(&self) -> Option<&str> {
        self.controller.catalog().names().nth(self.menu.selected)
    }

    /// Apply the highlighted persona and close the picker.
    pub fn confirm_persona(&mut self) {
        if let Some(name) = self.selected_persona().map(str::to_string) {
            self.controller.set_persona(&name);
        }
        self.menu.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let client = CompletionClient::new(LlmConfig::default(), Arc::new(PromptCatalog::builtin()));
        App::from_controller(Controller::new(client))
    }

    #[test]
    fn test_chat_state_unicode_editing() {
        let mut chat = ChatState::default();
        for c in "héllo".chars() {
            chat.handle_char(c);
        }
        chat.move_cursor_left();
        chat.move_cursor_left();
        chat.handle_backspace();
        assert_eq!(chat.input, "hélo");
        assert_eq!(chat.split_at_cursor(), ("hé", "lo"));

        chat.move_cursor_right();
        chat.move_cursor_right();
        chat.move_cursor_right();
        assert_eq!(chat.cursor_position, 4);
    }

    #[test]
    fn test_blank_submit_keeps_idle() {
        let mut app = test_app();
        app.chat.input = "   ".to_string();
        app.submit_message();
        assert!(app.controller.transcript().is_empty());
        assert_eq!(app.chat.input, "   ");
        assert_eq!(app.status(), ConnectionStatus::NotConfigured);
    }

    #[test]
    fn test_persona_menu_selects_persona() {
        let mut app = test_app();
        app.open_persona_menu();
        assert!(app.menu.visible);
        assert_eq!(app.menu.selected, 0);

        app.menu_down();
        app.menu_down();
        assert_eq!(app.selected_persona(), Some("Nutritionist"));
        app.confirm_persona();

        assert!(!app.menu.visible);
        assert_eq!(app.controller.persona(), "Nutritionist");

        app.open_persona_menu();
        assert_eq!(app.menu.selected, 2);
    }

    #[test]
    fn test_menu_down_stops_at_last_persona() {
        let mut app = test_app();
        app.open_persona_menu();
        for _ in 0..20 {
            app.menu_down();
        }
        assert_eq!(app.selected_persona(), Some("Mental Health Support"));
    }

    #[test]
    fn test_persona_menu_unavailable_while_busy() {
        let mut app = test_app();
        app.controller.begin_turn("hello").unwrap();
        app.open_persona_menu();
        assert!(!app.menu.visible);
        assert_eq!(app.status(), ConnectionStatus::AwaitingReply);
    }

    #[test]
    fn test_scroll_follow_and_release() {
        let mut scroll = ScrollState::default();
        scroll.update(10);
        assert_eq!(scroll.offset, 10);

        scroll.scroll_up();
        scroll.update(12);
        assert_eq!(scroll.offset, 9);

        scroll.scroll_page_down(12, 10);
        assert!(scroll.follow);
        scroll.update(15);
        assert_eq!(scroll.offset, 15);
    }
}
