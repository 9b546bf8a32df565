//! Terminal rendering surface.
//!
//! Draws the published board and forwards clicks by cell index. Turns run
//! as spawned tasks so the screen keeps refreshing while the agent thinks.

mod app;
mod input;
mod ui;

pub use app::{Action, App};

use crate::orchestrator::TurnOrchestrator;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Runs the terminal board until the user quits.
///
/// Tracing output must not go to stdout while this runs.
#[instrument(skip(orchestrator))]
pub async fn run_tui(orchestrator: Arc<TurnOrchestrator>) -> Result<()> {
    info!("Starting terminal board");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, orchestrator).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Terminal loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    orchestrator: Arc<TurnOrchestrator>,
) -> Result<()> {
    let mut app = App::new(orchestrator.subscribe());

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key.code) {
            Action::None => {}
            Action::Quit => {
                info!("User quit");
                return Ok(());
            }
            Action::Restart => {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move { orchestrator.restart().await });
            }
            Action::Click(pos) => {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    if let Err(e) = orchestrator.handle_cell_click(pos.to_index()).await {
                        warn!(error = %e, position = %pos, "Turn failed");
                    }
                });
            }
        }
    }
}
