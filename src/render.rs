//! Stateless projection of a board snapshot onto visual cells.
//!
//! The renderer knows nothing about terminals. It returns a flat list of
//! 64 [`VisualCell`]s that any backend can draw; the terminal frontend is one
//! such backend and tests are another.

use std::collections::HashSet;

use tracing::instrument;

use crate::chess::{BoardSnapshot, Side, Square};

/// Glyph shown for a piece code this client does not recognize.
pub const UNKNOWN_GLYPH: char = '?';

/// Checkerboard shade of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    /// Light square (row + col even).
    Light,
    /// Dark square.
    Dark,
}

/// Styling class of an occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceClass {
    /// White piece.
    White,
    /// Black piece.
    Black,
    /// Code without a recognizable side prefix.
    Unknown,
}

impl From<Side> for PieceClass {
    fn from(side: Side) -> Self {
        match side {
            Side::White => PieceClass::White,
            Side::Black => PieceClass::Black,
        }
    }
}

/// What stands on a cell, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// Glyph to draw.
    pub glyph: char,
    /// Styling class.
    pub class: PieceClass,
    /// Whether the code was recognized.
    pub recognized: bool,
}

/// Full visual state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualCell {
    /// Which cell.
    pub square: Square,
    /// Checker shade.
    pub shade: Shade,
    /// Occupant, if any.
    pub occupant: Option<Occupant>,
    /// Cell is the current selection.
    pub selected: bool,
    /// Cell is a reported destination of the selection.
    pub valid_move: bool,
}

/// Renders all 64 cells in row-major order, `a8` first.
///
/// The result is always the complete board, so callers replace whatever
/// they drew before instead of diffing.
#[instrument(skip(snapshot, highlighted), fields(highlighted = highlighted.len()))]
pub fn render(
    snapshot: &BoardSnapshot,
    highlighted: &HashSet<Square>,
    selected: Option<Square>,
) -> Vec<VisualCell> {
    snapshot
        .iter()
        .map(|(square, code)| VisualCell {
            square,
            shade: if square.is_light() {
                Shade::Light
            } else {
                Shade::Dark
            },
            occupant: code.map(|code| match code.piece() {
                Some(piece) => Occupant {
                    glyph: piece.glyph(),
                    class: piece.side.into(),
                    recognized: true,
                },
                None => Occupant {
                    glyph: UNKNOWN_GLYPH,
                    class: code.side().map_or(PieceClass::Unknown, PieceClass::from),
                    recognized: false,
                },
            }),
            selected: selected == Some(square),
            valid_move: highlighted.contains(&square),
        })
        .collect()
}
