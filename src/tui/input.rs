//! Cursor movement for keyboard navigation.

use crate::games::tictactoe::Position;
use crossterm::event::KeyCode;
use tracing::instrument;

/// Moves the cursor one cell with the arrow keys, stopping at the edges.
#[instrument]
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let index = cursor.to_index();
    let (row, col) = (index / 3, index % 3);

    let (row, col) = match key {
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        _ => (row, col),
    };

    Position::from_index(row * 3 + col).unwrap_or(cursor)
}
