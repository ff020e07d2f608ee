//! RoleChat - a terminal chat interface with switchable expert personas.

use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use rolechat::app::App;
use rolechat::config::Config;
use rolechat::{input, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::log_file_path(Config::config_dir().as_deref());
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let config = Config::load();
    let mut app = App::new_with_config(&config);
    tracing::info!(persona = app.controller.persona(), "starting rolechat");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = input::run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "event loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
