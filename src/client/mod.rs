//! Remote chess service access.
//!
//! [`GameService`] is the seam between the controller's driver and the
//! network. [`RestChessClient`] is the HTTP implementation; tests plug in
//! scripted implementations instead.

mod error;
mod rest;
mod wire;

pub use error::{ServiceError, ServiceErrorKind};
pub use rest::RestChessClient;

use std::collections::HashSet;

use crate::chess::{BoardSnapshot, GameInfo, GameSnapshot, Square};

/// Fallback reason when the service rejects a move without saying why.
pub const MOVE_REJECTED_FALLBACK: &str = "Invalid move!";

/// Operations offered by the chess service.
///
/// Each call is one request/response round trip. Implementations must
/// either return a fully populated value or a categorized [`ServiceError`];
/// partial payloads are [`ServiceErrorKind::Malformed`].
#[async_trait::async_trait]
pub trait GameService: Send + Sync {
    /// Current board.
    async fn fetch_board(&self) -> Result<BoardSnapshot, ServiceError>;

    /// Current turn and status.
    async fn fetch_info(&self) -> Result<GameInfo, ServiceError>;

    /// Destinations the service considers legal for the piece on `square`.
    ///
    /// Empty when the square is empty or its piece cannot move.
    async fn fetch_legal_moves(&self, square: Square) -> Result<HashSet<Square>, ServiceError>;

    /// Attempts a move and returns the resulting state.
    async fn submit_move(&self, from: Square, to: Square) -> Result<GameSnapshot, ServiceError>;

    /// Starts a brand new game.
    async fn new_game(&self) -> Result<GameSnapshot, ServiceError>;

    /// Resets the current game to the starting position.
    async fn reset_game(&self) -> Result<GameSnapshot, ServiceError>;

    /// Moves played so far in the service's own record.
    async fn fetch_history(&self) -> Result<Vec<(Square, Square)>, ServiceError>;

    /// Fetches board then info.
    async fn sync(&self) -> Result<GameSnapshot, ServiceError> {
        let board = self.fetch_board().await?;
        let info = self.fetch_info().await?;
        Ok(GameSnapshot::new(board, info))
    }
}
