//! Keyboard and mouse mapping.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::chess::{BOARD_SIZE, Square};
use crate::controller::Event;

use super::ui::{CELL_WIDTH, RANK_LABEL_WIDTH};

/// What a key press asks for.
#[derive(Debug, Clone)]
pub enum KeyAction {
    /// Leave the program.
    Quit,
    /// Move the keyboard cursor.
    MoveCursor(Square),
    /// Feed an event to the controller.
    Dispatch(Event),
    /// Nothing.
    Ignore,
}

/// Moves cursor based on arrow keys, stopping at the board edge.
pub fn move_cursor(cursor: Square, key: KeyCode) -> Square {
    let (row, col) = (cursor.row(), cursor.col());
    let last = BOARD_SIZE - 1;
    match key {
        KeyCode::Up | KeyCode::Char('k') if row > 0 => Square::new(row - 1, col),
        KeyCode::Down | KeyCode::Char('j') if row < last => Square::new(row + 1, col),
        KeyCode::Left | KeyCode::Char('h') if col > 0 => Square::new(row, col - 1),
        KeyCode::Right | KeyCode::Char('l') if col < last => Square::new(row, col + 1),
        _ => cursor,
    }
}

/// Maps a key press to an action.
pub fn key_action(key: KeyCode, cursor: Square) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('n') => KeyAction::Dispatch(Event::NewGameRequested),
        KeyCode::Char('r') => KeyAction::Dispatch(Event::ResetRequested),
        KeyCode::Char('s') => KeyAction::Dispatch(Event::ResyncRequested),
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Dispatch(Event::CellClicked(cursor)),
        KeyCode::Up
        | KeyCode::Down
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char('h' | 'j' | 'k' | 'l') => KeyAction::MoveCursor(move_cursor(cursor, key)),
        _ => KeyAction::Ignore,
    }
}

/// Square under a left click inside `grid`, the area holding the 8 board rows.
pub fn clicked_square(mouse: MouseEvent, grid: Rect) -> Option<Square> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let x = mouse.column.checked_sub(grid.x + RANK_LABEL_WIDTH)?;
    let y = mouse.row.checked_sub(grid.y)?;
    let col = x / CELL_WIDTH;
    if y >= u16::from(BOARD_SIZE) || col >= u16::from(BOARD_SIZE) {
        return None;
    }
    Some(Square::new(y as u8, col as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn cursor_stops_at_edges() {
        let corner = Square::new(0, 0);
        assert_eq!(move_cursor(corner, KeyCode::Up), corner);
        assert_eq!(move_cursor(corner, KeyCode::Left), corner);
        assert_eq!(move_cursor(corner, KeyCode::Down), Square::new(1, 0));
    }

    #[test]
    fn click_maps_to_cell() {
        let grid = Rect::new(10, 5, 42, 8);
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10 + RANK_LABEL_WIDTH + CELL_WIDTH * 4 + 1,
            row: 5 + 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(clicked_square(mouse, grid), Some(Square::new(7, 4)));
    }

    #[test]
    fn click_on_rank_label_is_ignored() {
        let grid = Rect::new(0, 0, 42, 8);
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(clicked_square(mouse, grid), None);
    }
}
