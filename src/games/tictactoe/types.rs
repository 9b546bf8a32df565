//! Core domain types for tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Wire code for an empty cell.
pub const EMPTY_CODE: &str = "-";

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// The human player (moves first).
    X,
    /// The remote agent.
    O,
}

impl Mark {
    /// Single-character wire code.
    pub fn code(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

/// Error for a wire code that is not `-`, `X` or `O`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid cell code {:?} (expected \"-\", \"X\" or \"O\")", code)]
pub struct CellCodeError {
    /// The rejected code.
    pub code: String,
}

/// A cell on the board.
///
/// Serialized as its single-character code so boards travel as
/// `["-", "X", "O", ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Cell {
    /// Unoccupied.
    #[default]
    Empty,
    /// Occupied by a mark.
    Occupied(Mark),
}

impl Cell {
    /// Single-character wire code.
    pub fn code(self) -> &'static str {
        match self {
            Cell::Empty => EMPTY_CODE,
            Cell::Occupied(mark) => mark.code(),
        }
    }

    /// Parses a wire code.
    #[instrument]
    pub fn from_code(code: &str) -> Result<Self, CellCodeError> {
        match code {
            "-" => Ok(Cell::Empty),
            "X" => Ok(Cell::Occupied(Mark::X)),
            "O" => Ok(Cell::Occupied(Mark::O)),
            other => Err(CellCodeError {
                code: other.to_string(),
            }),
        }
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }
}

impl TryFrom<String> for Cell {
    type Error = CellCodeError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Cell::from_code(&code)
    }
}

impl From<Cell> for &'static str {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        Cell::Occupied(mark)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// 3x3 board, always exactly 9 cells in row-major order
/// (`index = row * 3 + col`).
///
/// Boards are `Copy`: every snapshot is an independent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given index (0-8).
    #[instrument(skip(self))]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    #[instrument(skip(self))]
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    #[instrument(skip(self))]
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the occupied cells as `(index, mark)` pairs.
    #[instrument(skip(self))]
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Mark)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.mark().map(|mark| (index, mark)))
    }

    /// Returns a copy of this board with `mark` placed at `index`.
    ///
    /// Returns `None` when the index is out of bounds or the cell is
    /// occupied; occupied cells never change.
    #[instrument(skip(self), fields(board = %self))]
    pub fn place(&self, index: usize, mark: Mark) -> Option<Board> {
        if !self.is_empty(index) {
            return None;
        }
        let mut next = *self;
        next.cells[index] = Cell::Occupied(mark);
        Some(next)
    }

    /// Formats the board as a human-readable grid.
    #[instrument(skip(self))]
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Occupied(mark) => mark.code().to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            f.write_str(cell.code())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Board {
    type Err = CellCodeError;

    /// Parses a compact 9-character board such as `"XX-OO----"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Cell::Empty; 9];
        let mut chars = s.chars();
        for cell in cells.iter_mut() {
            let c = chars.next().ok_or_else(|| CellCodeError {
                code: s.to_string(),
            })?;
            *cell = Cell::from_code(c.encode_utf8(&mut [0; 4]))?;
        }
        if chars.next().is_some() {
            return Err(CellCodeError {
                code: s.to_string(),
            });
        }
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_leaves_other_cells_unchanged() {
        let before: Board = "X---O----".parse().unwrap();
        for index in 0..9 {
            if !before.is_empty(index) {
                assert_eq!(before.place(index, Mark::X), None);
                continue;
            }
            let after = before.place(index, Mark::X).unwrap();
            assert_eq!(after.get(index), Some(Cell::Occupied(Mark::X)));
            for other in (0..9).filter(|&i| i != index) {
                assert_eq!(after.get(other), before.get(other));
            }
        }
    }

    #[test]
    fn test_place_does_not_alias() {
        let before = Board::new();
        let after = before.place(4, Mark::X).unwrap();
        assert!(before.is_empty(4));
        assert!(!after.is_empty(4));
    }

    #[test]
    fn test_place_out_of_bounds() {
        assert_eq!(Board::new().place(9, Mark::O), None);
    }

    #[test]
    fn test_serializes_as_codes() {
        let board: Board = "O---X----".parse().unwrap();
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["O", "-", "-", "-", "X", "-", "-", "-", "-"])
        );
    }

    #[test]
    fn test_rejects_unknown_code() {
        let result: Result<Board, _> = serde_json::from_value(serde_json::json!([
            "?", "-", "-", "-", "-", "-", "-", "-", "-"
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let short: Result<Board, _> = serde_json::from_value(serde_json::json!(["-", "-", "-"]));
        assert!(short.is_err());
        let long: Result<Board, _> = serde_json::from_value(serde_json::json!([
            "-", "-", "-", "-", "-", "-", "-", "-", "-", "-"
        ]));
        assert!(long.is_err());
    }

    #[test]
    fn test_display_grid() {
        let board: Board = "X-------O".parse().unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|5|6\n-+-+-\n7|8|O");
    }
}
