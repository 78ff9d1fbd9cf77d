//! Chess domain types as seen by the client.
//!
//! Nothing here knows the rules of chess. These types only describe what
//! the service reports: where pieces stand, whose turn it is, and how the
//! game is going.

mod board;
mod info;
mod piece;
mod square;

pub use board::{BoardSnapshot, SnapshotError};
pub use info::{GameInfo, GameSnapshot, GameStatus};
pub use piece::{Kind, Piece, PieceCode, Side};
pub use square::{BOARD_SIZE, Square, SquareParseError, from_algebraic, to_algebraic};
