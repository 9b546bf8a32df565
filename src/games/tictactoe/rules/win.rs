//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark};
use tracing::instrument;

/// The 8 winning lines as board indices: rows, then columns, then diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks whether `mark` fully occupies any winning line.
#[instrument]
pub fn has_line(board: &Board, mark: Mark) -> bool {
    WIN_LINES.iter().any(|line| {
        line.iter()
            .all(|&index| board.get(index) == Some(Cell::Occupied(mark)))
    })
}

/// Returns the winner of the board, if any.
///
/// X is checked before O, each against the lines in [`WIN_LINES`] order.
/// A board where both marks complete a line cannot arise from alternating
/// play; it reports X.
#[instrument]
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|&mark| has_line(board, mark))
}
