//! Game metadata reported by the service.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::board::BoardSnapshot;
use super::piece::Side;

/// Status of the game as the service reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum GameStatus {
    /// Game in progress.
    Active,
    /// Game in progress, side to move is in check.
    Check,
    /// Side to move is mated.
    Checkmate,
    /// Side to move has no legal move and is not in check.
    Stalemate,
    /// Drawn by other means.
    Draw,
    /// White has won.
    #[serde(rename = "WHITE_WIN")]
    #[strum(serialize = "WHITE_WIN")]
    WhiteWin,
    /// Black has won.
    #[serde(rename = "BLACK_WIN")]
    #[strum(serialize = "BLACK_WIN")]
    BlackWin,
}

impl GameStatus {
    /// Whether the game is over.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate
                | GameStatus::Stalemate
                | GameStatus::Draw
                | GameStatus::WhiteWin
                | GameStatus::BlackWin
        )
    }
}

/// Turn and status information, replaced wholesale on every sync.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    /// Side to move.
    current_player: Side,
    /// Game status.
    game_state: GameStatus,
    /// Number of moves played so far.
    #[serde(default)]
    move_count: u32,
    /// Last move, e.g. `e2-e4`. Absent before the first move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_move: Option<String>,
}

impl GameInfo {
    /// Info for a fresh game: white to move, nothing played.
    pub fn initial() -> Self {
        Self::new(Side::White, GameStatus::Active, 0, None)
    }
}

/// The authoritative board and info pair, always replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct GameSnapshot {
    /// Board.
    board: BoardSnapshot,
    /// Info.
    info: GameInfo,
}

impl GameSnapshot {
    /// Standard starting position, white to move.
    pub fn initial() -> Self {
        Self::new(BoardSnapshot::standard(), GameInfo::initial())
    }
}
