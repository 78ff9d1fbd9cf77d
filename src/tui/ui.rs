//! Stateless UI rendering of the controller state.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::chess::{BOARD_SIZE, Square};
use crate::controller::Controller;
use crate::render::{PieceClass, Shade, VisualCell};

/// Terminal columns per board cell.
pub const CELL_WIDTH: u16 = 5;
/// Terminal columns taken by the rank labels left of the grid.
pub const RANK_LABEL_WIDTH: u16 = 2;

const BOARD_WIDTH: u16 = RANK_LABEL_WIDTH + CELL_WIDTH * BOARD_SIZE as u16 + 2;
const BOARD_HEIGHT: u16 = BOARD_SIZE as u16 + 1 + 2;

const LIGHT: Color = Color::Rgb(240, 217, 181);
const DARK: Color = Color::Rgb(181, 136, 99);
const SELECTED: Color = Color::Rgb(246, 246, 105);
const VALID_MOVE: Color = Color::Rgb(130, 200, 110);

/// Screen regions.
#[derive(Debug, Clone, Copy)]
pub struct Panels {
    /// Title bar.
    pub title: Rect,
    /// Bordered board area.
    pub board: Rect,
    /// The 8 board rows inside the border, rank labels included.
    pub grid: Rect,
    /// Info and history.
    pub side: Rect,
    /// Message, loading indicator and key help.
    pub footer: Rect,
}

/// Splits the frame. Drawing and mouse hit-testing both go through here so
/// they always agree on where the cells are.
pub fn panels(area: Rect) -> Panels {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Title
            Constraint::Min(BOARD_HEIGHT),    // Board + side panel
            Constraint::Length(4),            // Footer
        ])
        .split(area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    let board = Rect {
        height: BOARD_HEIGHT.min(cols[0].height),
        ..cols[0]
    };
    let inner = Block::default().borders(Borders::ALL).inner(board);
    let grid = Rect {
        height: (BOARD_SIZE as u16).min(inner.height),
        ..inner
    };

    Panels {
        title: rows[0],
        board,
        grid,
        side: cols[1],
        footer: rows[2],
    }
}

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, controller: &Controller, cursor: Square) {
    let panels = panels(frame.area());

    let title = Paragraph::new("Strictly Chess")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, panels.title);

    draw_board(frame, panels.board, &controller.cells(), cursor);
    draw_side(frame, panels.side, controller);
    draw_footer(frame, panels.footer, controller);
}

fn draw_board(frame: &mut Frame, area: Rect, cells: &[VisualCell], cursor: Square) {
    let mut lines: Vec<Line> = cells
        .chunks(BOARD_SIZE as usize)
        .enumerate()
        .map(|(row, rank)| {
            let mut spans = vec![Span::styled(
                format!("{} ", char::from(b'8' - row as u8)),
                Style::default().fg(Color::DarkGray),
            )];
            spans.extend(rank.iter().map(|cell| cell_span(cell, cell.square == cursor)));
            Line::from(spans)
        })
        .collect();

    let files: String = (b'a'..=b'h')
        .map(|file| format!("  {}  ", char::from(file)))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("{:width$}{}", "", files, width = RANK_LABEL_WIDTH as usize),
        Style::default().fg(Color::DarkGray),
    )));

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Board"));
    frame.render_widget(board, area);
}

fn cell_span(cell: &VisualCell, under_cursor: bool) -> Span<'static> {
    let background = if cell.selected {
        SELECTED
    } else if cell.valid_move {
        VALID_MOVE
    } else {
        match cell.shade {
            Shade::Light => LIGHT,
            Shade::Dark => DARK,
        }
    };

    let (text, foreground) = match cell.occupant {
        Some(occupant) => (
            format!("  {}  ", occupant.glyph),
            match occupant.class {
                PieceClass::White => Color::White,
                PieceClass::Black => Color::Black,
                PieceClass::Unknown => Color::Magenta,
            },
        ),
        None if cell.valid_move => ("  •  ".to_string(), Color::DarkGray),
        None => ("     ".to_string(), Color::DarkGray),
    };

    let mut style = Style::default()
        .bg(background)
        .fg(foreground)
        .add_modifier(Modifier::BOLD);
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(text, style)
}

fn draw_side(frame: &mut Frame, area: Rect, controller: &Controller) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let info_lines = match controller.game() {
        Some(game) => {
            let info = game.info();
            vec![
                Line::from(format!("Turn:      {}", info.current_player())),
                Line::from(format!("Status:    {}", info.game_state())),
                Line::from(format!("Moves:     {}", info.move_count())),
                Line::from(format!(
                    "Last move: {}",
                    info.last_move().as_deref().unwrap_or("-")
                )),
            ]
        }
        None => vec![Line::from("Waiting for game...")],
    };
    let info = Paragraph::new(info_lines).block(Block::default().borders(Borders::ALL).title("Game"));
    frame.render_widget(info, parts[0]);

    // Newest entries stay visible when the list outgrows the panel.
    let lines = controller.history().lines();
    let visible = parts[1].height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let history: Vec<Line> = lines.into_iter().skip(skip).map(Line::from).collect();
    let history =
        Paragraph::new(history).block(Block::default().borders(Borders::ALL).title("Moves"));
    frame.render_widget(history, parts[1]);
}

fn draw_footer(frame: &mut Frame, area: Rect, controller: &Controller) {
    let message = controller
        .notice()
        .map(|notice| notice.text().clone())
        .unwrap_or_default();
    let loading = if controller.is_loading() {
        "Loading..."
    } else {
        ""
    };

    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(loading, Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            "click or arrows+enter: select/move | n: new game | r: reset | s: resync | q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
