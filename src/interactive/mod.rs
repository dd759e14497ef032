//! Interactive terminal UI
//!
//! Screens for projects, capacity and resources over one backend snapshot,
//! plus forms for new assignments, projects and resources.

pub mod app;
pub mod events;
pub mod form;
pub mod form_ui;
pub mod messages;
pub mod summary_chart;
pub mod ui;
pub mod utils;
pub mod week_view;

pub use app::App;
pub use events::EventHandler;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use planner::ApiClient;

/// Run the interactive UI application
pub async fn run_interactive(client: ApiClient) -> Result<()> {
    info!(api_url = %client.base_url(), "Starting interactive UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client);
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Main application loop
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Loads run after a draw so the overlay is on screen while waiting
        if app.has_pending_load() {
            app.run_pending().await;
            continue;
        }

        if let Some(event) = event_handler.next()? {
            if !app.handle_event(event).await? {
                break;
            }
        }
    }

    Ok(())
}
