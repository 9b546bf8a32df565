mod position;
pub mod rules;
mod types;

pub use position::Position;
pub use rules::{TurnOutcome, WIN_LINES, is_tie, winner};
pub use types::{Board, Cell, CellCodeError, EMPTY_CODE, Mark};
