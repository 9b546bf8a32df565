//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state.
//! Nothing here mutates a board or performs I/O.

pub mod draw;
pub mod win;

pub use draw::is_tie;
pub use win::{WIN_LINES, has_line, winner};

use super::Board;
use super::Mark;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Terminal evaluation of a board.
///
/// `winner` and `tied` are computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Mark with a completed line, if any.
    pub winner: Option<Mark>,
    /// Whether every cell is occupied.
    pub tied: bool,
}

impl TurnOutcome {
    /// Evaluates a board.
    #[instrument]
    pub fn evaluate(board: &Board) -> Self {
        Self {
            winner: winner(board),
            tied: is_tie(board),
        }
    }

    /// Whether the game is over.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.tied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_in_progress() {
        let outcome = TurnOutcome::evaluate(&"X---O----".parse().unwrap());
        assert_eq!(outcome.winner, None);
        assert!(!outcome.tied);
        assert!(!outcome.is_terminal());
    }

    #[test]
    fn test_outcome_won_and_full() {
        // Full board where X completed the top row.
        let outcome = TurnOutcome::evaluate(&"XXXOOXXOO".parse().unwrap());
        assert_eq!(outcome.winner, Some(Mark::X));
        assert!(outcome.tied);
        assert!(outcome.is_terminal());
    }
}
