use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

const MENU_WIDTH: u16 = 44;

/// Render the persona picker overlay with modal effect.
pub fn render_menu(f: &mut Frame, app: &App) {
    let catalog = app.controller.catalog();
    let current = app.controller.persona();
    let area = f.size();

    // Darken the background
    let backdrop = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    f.render_widget(backdrop, area);

    // +6 for borders, padding, separator and hints
    let menu_width = MENU_WIDTH.min(area.width);
    let menu_height = (catalog.len() as u16 + 6).min(area.height);

    let menu_x = area.width.saturating_sub(menu_width) / 2;
    let menu_y = area.height.saturating_sub(menu_height) / 2;

    // Shadow layer (offset by 2,1), clipped to the frame
    let shadow_area = Rect {
        x: menu_x + 2,
        y: menu_y + 1,
        width: menu_width,
        height: menu_height,
    }
    .intersection(area);
    let shadow = Block::default().style(Style::default().bg(Color::Rgb(10, 10, 15)));
    f.render_widget(shadow, shadow_area);

    let menu_area = Rect {
        x: menu_x,
        y: menu_y,
        width: menu_width,
        height: menu_height,
    };
    f.render_widget(Clear, menu_area);

    let row_width = menu_width.saturating_sub(2) as usize;
    let mut menu_lines = vec![Line::from("")];

    for (i, name) in catalog.names().enumerate() {
        let marker = if name == current { "●" } else { " " };
        let label = format!("{} {}", marker, name);

        if i == app.menu.selected {
            let bg_color = Color::Rgb(60, 60, 80);
            let fg_color = Color::Rgb(0, 255, 255);
            let padding = row_width.saturating_sub(label.chars().count() + 4);
            menu_lines.push(Line::from(vec![
                Span::styled(
                    "  ▸ ",
                    Style::default()
                        .fg(fg_color)
                        .bg(bg_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    label,
                    Style::default()
                        .fg(fg_color)
                        .bg(bg_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" ".repeat(padding), Style::default().bg(bg_color)),
            ]));
        } else {
            menu_lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(label, Style::default().fg(Color::Rgb(140, 140, 160))),
            ]));
        }
    }

    menu_lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(row_width.saturating_sub(4))),
        Style::default().fg(Color::Rgb(60, 60, 80)),
    )));

    menu_lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            "↑↓",
            Style::default()
                .fg(Color::Rgb(0, 255, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Navigate  ", Style::default().fg(Color::Rgb(100, 100, 120))),
        Span::styled(
            "⏎",
            Style::default()
                .fg(Color::Rgb(0, 255, 128))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Select  ", Style::default().fg(Color::Rgb(100, 100, 120))),
        Span::styled(
            "Esc",
            Style::default()
                .fg(Color::Rgb(255, 100, 100))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Close", Style::default().fg(Color::Rgb(100, 100, 120))),
    ]));

    let menu_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
        .title(Span::styled(
            " Persona ",
            Style::default()
                .fg(Color::Rgb(0, 255, 255))
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Rgb(25, 25, 35)));

    let menu_text = Paragraph::new(menu_lines)
        .alignment(Alignment::Left)
        .block(menu_block);

    f.render_widget(menu_text, menu_area);
}
