use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

use crate::app::{App, ConnectionStatus};
use crate::config::{ColorConfig, Config};
use crate::message::Role;

use super::gradient::{gradient_block_with_status, gradient_color};
use super::menu::render_menu;
use super::text::{spinner_glyph, wrap_text};

const HINTS: &str = " ⏎ Send · Shift+⏎ Newline · Ctrl+P Persona · Esc Quit ";

/// Main UI rendering function.
pub fn ui(f: &mut Frame, app: &mut App, config: &Config) {
    let colors = &config.colors;
    let (chat_start, chat_end) = colors.chat_gradient();
    let (input_start, input_end) = colors.input_gradient();

    let border_color = Color::Black;
    let bg_color = Color::Rgb(20, 20, 25);

    // Fill entire background with border color to create thick border effect
    let background = Block::default().style(Style::default().bg(border_color));
    f.render_widget(background, f.size());

    // Inner area with margin to create thick border (2 chars on sides, 1 on top/bottom)
    let inner_area = f.size().inner(&Margin {
        horizontal: 2,
        vertical: 1,
    });

    let inner_bg = Block::default().style(Style::default().bg(bg_color));
    f.render_widget(inner_bg, inner_area);

    // Chat area (top) and input area (bottom)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner_area);

    // Borders take two columns, plus one for the scrollbar
    let text_width = chunks[0].width.saturating_sub(3) as usize;
    let lines = transcript_lines(app, colors, text_width);

    let visible_rows = chunks[0].height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_rows);
    app.scroll.update(max_scroll);

    let (status_text, status_color) = match app.status() {
        ConnectionStatus::NotConfigured => ("● No API Key", Color::Rgb(255, 100, 100)),
        ConnectionStatus::Ready => ("● Ready", Color::Rgb(100, 255, 100)),
        ConnectionStatus::AwaitingReply => ("● Waiting", Color::Rgb(100, 200, 255)),
    };
    let status = format!(" {} · {} ", app.controller.persona(), status_text);

    let transcript = Paragraph::new(lines)
        .block(gradient_block_with_status(
            " RoleChat ",
            status,
            status_color,
            HINTS,
            chat_start,
            chat_end,
        ))
        .scroll((app.scroll.offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(transcript, chunks[0]);

    if max_scroll > 0 {
        let scroll_position = app.scroll.offset as f32 / max_scroll as f32;
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("░"))
            .thumb_symbol("█")
            .style(Style::default().fg(gradient_color(chat_start, chat_end, scroll_position)));

        f.render_stateful_widget(
            scrollbar,
            chunks[0].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app.scroll.scrollbar,
        );
    }

    // Input box: left border only, dark grey background
    let input_block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(gradient_color(input_start, input_end, 0.5)))
        .style(Style::default().bg(Color::Rgb(30, 30, 35)));

    let input = Paragraph::new(input_text(app))
        .style(Style::default().fg(Color::White))
        .block(input_block)
        .wrap(Wrap { trim: false });

    f.render_widget(input, chunks[1]);

    if app.menu.visible {
        render_menu(f, app);
    }
}

/// Render the transcript into display lines, wrapped to `width`.
fn transcript_lines(app: &App, colors: &ColorConfig, width: usize) -> Vec<Line<'static>> {
    let messages = app.controller.transcript();
    let current_persona = app.controller.persona();
    let mut lines = Vec::new();

    if messages.is_empty() && !app.is_busy() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Welcome",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "  Select a persona with Ctrl+P and start your conversation!",
            Style::default().fg(Color::Rgb(140, 140, 160)),
        )));
        return lines;
    }

    let body_width = width.saturating_sub(2);
    for msg in messages {
        let color = match msg.role {
            Role::User => ColorConfig::to_color(&colors.user_text),
            Role::Assistant => ColorConfig::to_color(&colors.assistant_text),
        };

        lines.push(Line::from(Span::styled(
            msg.header(current_persona),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for line in wrap_text(&msg.content, body_width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(color),
            )));
        }
        lines.push(Line::from(""));
    }

    if app.is_busy() {
        lines.push(Line::from(vec![
            Span::styled(
                spinner_glyph(app.animation.spinner_frame),
                Style::default().fg(Color::Rgb(100, 200, 255)),
            ),
            Span::styled(
                " Generating response...",
                Style::default().fg(Color::Rgb(140, 140, 160)),
            ),
        ]));
    }

    lines
}

/// Input line with the cursor drawn at its position.
fn input_text(app: &App) -> Text<'_> {
    let cursor_char = if app.animation.cursor_visible { "▎" } else { " " };
    let cursor = Span::styled(
        cursor_char,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::SLOW_BLINK),
    );
    let placeholder = Style::default().fg(Color::Rgb(100, 100, 120));

    if app.chat.input.is_empty() {
        let hint = if app.is_busy() {
            "Waiting for reply..."
        } else {
            "Type your message here..."
        };
        return Text::from(Line::from(vec![cursor, Span::styled(hint, placeholder)]));
    }

    let (before, after) = app.chat.split_at_cursor();
    let mut lines: Vec<Line> = before.split('\n').map(Line::from).collect();
    let mut rest = after.split('\n');

    if let Some(last) = lines.last_mut() {
        last.spans.push(cursor);
        if let Some(first) = rest.next() {
            last.spans.push(Span::raw(first));
        }
    }
    lines.extend(rest.map(Line::from));

    Text::from(lines)
}
