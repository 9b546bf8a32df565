//! Tests for board positions and terminal-state evaluation.

use strictly_rl::{Board, Mark, Position, TurnOutcome, WIN_LINES, is_tie, winner};

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

#[test]
fn test_position_index_round_trip() {
    assert_eq!(Position::TopLeft.to_index(), 0);
    assert_eq!(Position::Center.to_index(), 4);
    assert_eq!(Position::from_index(8), Some(Position::BottomRight));
    assert_eq!(Position::from_index(9), None);
}

#[test]
fn test_valid_moves_filters_occupied() {
    let board = board("X---O----");

    let valid = Position::valid_moves(&board);

    assert_eq!(valid.len(), 7);
    assert!(!valid.contains(&Position::TopLeft));
    assert!(!valid.contains(&Position::Center));
    assert!(valid.contains(&Position::BottomRight));
}

#[test]
fn test_every_line_wins_for_both_marks() {
    for line in WIN_LINES {
        for mark in [Mark::X, Mark::O] {
            let mut b = Board::new();
            for index in line {
                b = b.place(index, mark).unwrap();
            }
            assert_eq!(winner(&b), Some(mark), "line {:?}", line);
            assert!(!is_tie(&b));
        }
    }
}

#[test]
fn test_full_board_with_win_is_won_and_tied() {
    let b = board("XXXOOXXOO");
    assert_eq!(winner(&b), Some(Mark::X));
    assert!(is_tie(&b));
    assert!(TurnOutcome::evaluate(&b).is_terminal());
}

#[test]
fn test_double_win_reports_x() {
    let b = board("XXXOOO---");
    assert_eq!(
        TurnOutcome::evaluate(&b),
        TurnOutcome {
            winner: Some(Mark::X),
            tied: false,
        }
    );
}

#[test]
fn test_open_board_is_not_terminal() {
    let outcome = TurnOutcome::evaluate(&board("XO--X---O"));
    assert!(!outcome.is_terminal());
}
