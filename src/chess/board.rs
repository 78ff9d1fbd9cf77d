//! Immutable board snapshots received from the chess service.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::piece::{Kind, Piece, PieceCode, Side};
use super::square::{BOARD_SIZE, Square};

const SIZE: usize = BOARD_SIZE as usize;

type Grid = [[Option<PieceCode>; SIZE]; SIZE];

/// 8×8 grid of optional piece codes, `[row][col]` with row 0 = rank 8.
///
/// Snapshots are never patched. Every sync with the service produces a new
/// one that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<String>>>", into = "Vec<Vec<Option<String>>>")]
pub struct BoardSnapshot {
    cells: Grid,
}

impl BoardSnapshot {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard starting position.
    #[instrument]
    pub fn standard() -> Self {
        const BACK_RANK: [Kind; SIZE] = [
            Kind::Rook,
            Kind::Knight,
            Kind::Bishop,
            Kind::Queen,
            Kind::King,
            Kind::Bishop,
            Kind::Knight,
            Kind::Rook,
        ];

        let mut cells = Grid::default();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            cells[0][col] = Some(Piece::new(Side::Black, *kind).code());
            cells[1][col] = Some(Piece::new(Side::Black, Kind::Pawn).code());
            cells[6][col] = Some(Piece::new(Side::White, Kind::Pawn).code());
            cells[7][col] = Some(Piece::new(Side::White, *kind).code());
        }
        Self { cells }
    }

    /// Returns a copy of this snapshot with `square` set to `code`.
    pub fn with(mut self, square: Square, code: Option<PieceCode>) -> Self {
        self.cells[usize::from(square.row())][usize::from(square.col())] = code;
        self
    }

    /// Piece code at `square`, if occupied.
    pub fn get(&self, square: Square) -> Option<&PieceCode> {
        self.cells[usize::from(square.row())][usize::from(square.col())].as_ref()
    }

    /// Side owning the piece on `square`, if any.
    pub fn side_at(&self, square: Square) -> Option<Side> {
        self.get(square).and_then(PieceCode::side)
    }

    /// Iterates every square with its occupant in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Option<&PieceCode>)> + '_ {
        Square::all().map(move |square| (square, self.get(square)))
    }

    /// Plain-text rendering with rank and file labels.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            out.push(char::from(b'8' - row));
            for col in 0..BOARD_SIZE {
                let square = Square::new(row, col);
                let symbol = match self.get(square) {
                    Some(code) => code.piece().map(Piece::glyph).unwrap_or('?'),
                    None if square.is_light() => '.',
                    None => ':',
                };
                out.push(' ');
                out.push(symbol);
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }
}

impl TryFrom<Vec<Vec<Option<String>>>> for BoardSnapshot {
    type Error = SnapshotError;

    fn try_from(rows: Vec<Vec<Option<String>>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE {
            return Err(SnapshotError::new(format!(
                "expected {SIZE} rows, got {}",
                rows.len()
            )));
        }

        let mut cells = Grid::default();
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != SIZE {
                return Err(SnapshotError::new(format!(
                    "row {row} has {} cells, expected {SIZE}",
                    values.len()
                )));
            }
            for (col, value) in values.into_iter().enumerate() {
                cells[row][col] = value.filter(|raw| !raw.is_empty()).map(PieceCode::new);
            }
        }
        Ok(Self { cells })
    }
}

impl From<BoardSnapshot> for Vec<Vec<Option<String>>> {
    fn from(board: BoardSnapshot) -> Self {
        board
            .cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|code| code.as_str().to_string()))
                    .collect()
            })
            .collect()
    }
}

/// A board payload that is not an 8×8 grid.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
