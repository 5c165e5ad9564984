// duedeck - A TUI todo list that keeps an eye on deadlines
// Entry point for the application

mod app;
mod models;
mod overdue;
mod storage;
mod ui;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::storage::FileStorage;

fn main() -> anyhow::Result<()> {
    // Initialize the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Todos live in a JSON file under the user's data directory
    let storage = FileStorage::new(FileStorage::default_path());
    let mut app = app::App::new(storage);
    let result = app.run(&mut terminal);

    // Cleanup and restore terminal on exit
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors that occurred during app execution
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
