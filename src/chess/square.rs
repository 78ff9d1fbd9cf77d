//! Board coordinates and algebraic notation.
//!
//! Row 0 is rank 8 and column 0 is file `a`, so the top-left cell of the
//! rendered grid is `a8` and the bottom-right one is `h1`.

use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: u8 = 8;

/// A cell on the 8×8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from grid coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside `0..8`. Use [`Square::try_new`]
    /// for coordinates received from the service.
    #[track_caller]
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "square out of range: row {row}, col {col}"
        );
        Self { row, col }
    }

    /// Creates a square from coordinates that came from outside the crate.
    pub fn try_new(row: i64, col: i64) -> Option<Self> {
        let row = u8::try_from(row).ok().filter(|r| *r < BOARD_SIZE)?;
        let col = u8::try_from(col).ok().filter(|c| *c < BOARD_SIZE)?;
        Some(Self { row, col })
    }

    /// Grid row, 0 at the top (rank 8).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Grid column, 0 at the left (file a).
    pub fn col(self) -> u8 {
        self.col
    }

    /// File letter `a`..=`h`.
    pub fn file(self) -> char {
        char::from(b'a' + self.col)
    }

    /// Rank digit `1`..=`8`.
    pub fn rank(self) -> char {
        char::from(b'8' - self.row)
    }

    /// Algebraic name of this square, e.g. `e4`.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Whether the square is a light one on the checkerboard.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }

    /// Every square in row-major order, `a8` first and `h1` last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
    }
}

/// Converts grid coordinates to algebraic notation.
///
/// # Panics
///
/// Panics on coordinates outside `0..8`.
#[track_caller]
pub fn to_algebraic(row: u8, col: u8) -> String {
    Square::new(row, col).to_algebraic()
}

/// Converts algebraic notation back to `(row, col)`.
#[instrument]
pub fn from_algebraic(notation: &str) -> Result<(u8, u8), SquareParseError> {
    let square: Square = notation.parse()?;
    Ok((square.row, square.col))
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareParseError::new(format!(
                "expected two characters, got {s:?}"
            )));
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) {
            return Err(SquareParseError::new(format!("bad file in {s:?}")));
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(SquareParseError::new(format!("bad rank in {s:?}")));
        }

        Ok(Self {
            row: b'8' - rank,
            col: file - b'a',
        })
    }
}

impl TryFrom<String> for Square {
    type Error = SquareParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_algebraic()
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Algebraic notation that does not name a square.
#[derive(Debug, Clone, Display, Error)]
#[display("Square parse error: {} at {}:{}", message, file, line)]
pub struct SquareParseError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SquareParseError {
    /// Creates a new parse error with caller location tracking.
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
