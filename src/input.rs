use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::app::App;
use crate::config::Config;
use crate::ui;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running the app
    Continue,
    /// Exit the app
    Exit,
}

/// Cursor blink interval in milliseconds.
const CURSOR_BLINK_MS: u64 = 530;

/// Spinner frame interval in milliseconds.
const SPINNER_FRAME_MS: u64 = 80;

/// Run the main application loop.
///
/// Must run inside a tokio runtime: submitting spawns the completion task.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> io::Result<()> {
    let behavior = &config.behavior;
    let mut last_cursor_toggle = Instant::now();
    let mut last_spinner_tick = Instant::now();

    loop {
        // Settle a finished request before drawing
        app.process_reply();

        if app.is_busy() && last_spinner_tick.elapsed() >= Duration::from_millis(SPINNER_FRAME_MS) {
            app.animation.tick_spinner();
            last_spinner_tick = Instant::now();
        }

        terminal.draw(|f| ui::ui(f, app, config))?;

        if last_cursor_toggle.elapsed() >= Duration::from_millis(CURSOR_BLINK_MS) {
            app.animation.toggle_cursor();
            last_cursor_toggle = Instant::now();
        }

        // Poll fast while a reply is pending so it shows up promptly
        let timeout = if app.is_busy() {
            Duration::from_millis(behavior.busy_poll_ms)
        } else {
            Duration::from_millis(behavior.idle_poll_ms)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Reset cursor to visible on any keypress
                    app.animation.cursor_visible = true;
                    last_cursor_toggle = Instant::now();

                    if handle_key_event(app, key.code, key.modifiers, config) == HandleResult::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Handle a key event and return whether to continue or exit.
pub fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config: &Config,
) -> HandleResult {
    // Global shortcuts
    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            return HandleResult::Exit;
        }
        KeyCode::Char('p') if modifiers.contains(KeyModifiers::CONTROL) => {
            if app.menu.visible {
                app.menu.close();
            } else {
                app.open_persona_menu();
            }
            return HandleResult::Continue;
        }
        _ => {}
    }

    if app.menu.visible {
        handle_menu_keys(app, code)
    } else {
        handle_normal_keys(app, code, modifiers, config.behavior.scroll_page_size)
    }
}

/// Handle key events when the persona picker is open.
fn handle_menu_keys(app: &mut App, code: KeyCode) -> HandleResult {
    match code {
        KeyCode::Up => app.menu_up(),
        KeyCode::Down => app.menu_down(),
        KeyCode::Enter => app.confirm_persona(),
        KeyCode::Esc => app.menu.close(),
        _ => {}
    }
    HandleResult::Continue
}

/// Handle key events in normal (non-menu) mode.
fn handle_normal_keys(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> HandleResult {
    let max_scroll = app.scroll.max;

    match code {
        KeyCode::Enter
            if modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.handle_char('\n');
        }
        KeyCode::Enter => {
            if !app.is_busy() {
                app.submit_message();
            }
        }
        KeyCode::Char(c) => app.handle_char(c),
        KeyCode::Backspace => app.handle_backspace(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Up => app.scroll.scroll_up(),
        KeyCode::Down => app.scroll.scroll_down(max_scroll),
        KeyCode::PageUp => app.scroll.scroll_page_up(page_size),
        KeyCode::PageDown => app.scroll.scroll_page_down(max_scroll, page_size),
        KeyCode::Home => app.scroll.scroll_to_top(),
        KeyCode::End => app.scroll.scroll_to_bottom(),
        KeyCode::Esc => return HandleResult::Exit,
        _ => {}
    }
    HandleResult::Continue
}
