//! Application state for the terminal board.

use crate::games::tictactoe::{Mark, Position, TurnOutcome};
use crate::orchestrator::GameView;
use crossterm::event::KeyCode;
use tokio::sync::watch;
use tracing::instrument;

use super::input::move_cursor;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to forward.
    None,
    /// Forward a click on this cell.
    Click(Position),
    /// Restart the game.
    Restart,
    /// Leave the TUI.
    Quit,
}

/// Main application state.
pub struct App {
    view: watch::Receiver<GameView>,
    cursor: Position,
}

impl App {
    /// Creates the app over the orchestrator's published view.
    #[instrument(skip(view))]
    pub fn new(view: watch::Receiver<GameView>) -> Self {
        Self {
            view,
            cursor: Position::Center,
        }
    }

    /// Latest published snapshot.
    pub fn view(&self) -> GameView {
        self.view.borrow().clone()
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Maps a key press to an action, moving the cursor as needed.
    #[instrument(skip(self), fields(cursor = %self.cursor))]
    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') => Action::Restart,
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor),
            KeyCode::Char(c) => match Position::from_digit(c) {
                Some(pos) => {
                    self.cursor = pos;
                    self.click(pos)
                }
                None => Action::None,
            },
            other => {
                self.cursor = move_cursor(self.cursor, other);
                Action::None
            }
        }
    }

    /// Disabled cells (occupied, or any cell while busy) produce no click.
    fn click(&self, pos: Position) -> Action {
        let view = self.view.borrow();
        if !view.busy && Position::valid_moves(&view.board).contains(&pos) {
            Action::Click(pos)
        } else {
            Action::None
        }
    }

    /// Status line for the current snapshot.
    pub fn status_message(&self) -> String {
        let view = self.view.borrow();
        if let Some(error) = &view.last_error {
            return format!("Turn failed: {}", error);
        }
        let outcome = TurnOutcome::evaluate(&view.board);
        match (view.busy, outcome.winner) {
            (true, Some(Mark::X)) => "You win! New game starting...".to_string(),
            (true, Some(Mark::O)) => "Agent wins! New game starting...".to_string(),
            (true, None) if outcome.tied => "Draw! New game starting...".to_string(),
            (true, None) => "Agent is thinking...".to_string(),
            (false, _) => "Your move (X)".to_string(),
        }
    }
}
