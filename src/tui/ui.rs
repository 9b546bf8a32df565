//! Stateless UI rendering for tic-tac-toe.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::instrument;

use super::app::App;
use crate::games::tictactoe::{Board, Cell, Mark, Position};

/// Renders the board with cursor highlight, status line and key help.
#[instrument(skip_all)]
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Strictly RL - Tic Tac Toe vs Agent")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let view = app.view();
    draw_board(frame, chunks[1], &view.board, app.cursor(), view.busy);

    let status_style = if view.last_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let status = Paragraph::new(app.status_message())
        .style(status_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("Arrows + Enter or 1-9: move | R: Restart | Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, board: &Board, cursor: Position, busy: bool) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, chunk) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(chunk);

        for (col, cell_area) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
            if let Some(pos) = Position::from_index(row * 3 + col) {
                draw_cell(frame, cell_area, board, pos, pos == cursor && !busy);
            }
        }
        draw_separator_vertical(frame, cols[1]);
        draw_separator_vertical(frame, cols[3]);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_cell(frame: &mut Frame, area: Rect, board: &Board, pos: Position, highlighted: bool) {
    let (symbol, base_style) = match board.get(pos.to_index()).unwrap_or_default() {
        Cell::Empty => ("   ", Style::default().fg(Color::DarkGray)),
        Cell::Occupied(Mark::X) => (
            " X ",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Cell::Occupied(Mark::O) => (
            " O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if highlighted {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph =
        Paragraph::new(Line::from(Span::styled(symbol, style))).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("│\n│\n│").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
