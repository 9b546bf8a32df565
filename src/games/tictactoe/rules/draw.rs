//! Tie detection logic for tic-tac-toe.

use super::super::{Board, Cell};
use tracing::instrument;

/// Checks if every cell is occupied.
///
/// Computed independently of [`winner`](super::winner): a full board
/// with a completed line is both won and tied.
#[instrument]
pub fn is_tie(board: &Board) -> bool {
    board.cells().iter().all(|cell| *cell != Cell::Empty)
}
