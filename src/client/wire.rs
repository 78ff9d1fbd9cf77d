//! JSON bodies exchanged with the chess service.

use serde::{Deserialize, Serialize};

use crate::chess::{BoardSnapshot, GameInfo, GameSnapshot, Square};

use super::ServiceError;

/// `GET chess/board`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BoardBody {
    pub board: BoardSnapshot,
}

/// `GET chess/moves`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovesBody {
    #[serde(default)]
    pub valid_moves: Option<Vec<Square>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST chess/move`, `chess/new` and `chess/reset`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MutationBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub board: Option<BoardSnapshot>,
    #[serde(default)]
    pub game_info: Option<GameInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationBody {
    /// Splits the body into the new authoritative state or an error.
    ///
    /// `success:false` is a rejection carrying the service's reason, or
    /// `fallback` when it gave none. `success:true` without both `board`
    /// and `gameInfo` is malformed.
    #[track_caller]
    pub fn into_snapshot(self, fallback: &str) -> Result<GameSnapshot, ServiceError> {
        if !self.success {
            return Err(ServiceError::rejected(
                self.error.unwrap_or_else(|| fallback.to_string()),
            ));
        }
        match (self.board, self.game_info) {
            (Some(board), Some(info)) => Ok(GameSnapshot::new(board, info)),
            (None, _) => Err(ServiceError::malformed("success response without board")),
            (_, None) => Err(ServiceError::malformed("success response without gameInfo")),
        }
    }
}

/// Any body that may carry an `error` string.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Grid coordinate as the service serializes it inside history entries.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GridPoint {
    pub row: i64,
    pub col: i64,
}

/// One entry of `GET chess/history`. Other fields are ignored.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HistoryMove {
    pub from: GridPoint,
    pub to: GridPoint,
}

/// `GET chess/history`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HistoryBody {
    pub history: Vec<HistoryMove>,
}

impl HistoryBody {
    /// Converts entries to squares, rejecting coordinates off the board.
    #[track_caller]
    pub fn into_moves(self) -> Result<Vec<(Square, Square)>, ServiceError> {
        self.history
            .into_iter()
            .map(|entry| {
                let from = Square::try_new(entry.from.row, entry.from.col);
                let to = Square::try_new(entry.to.row, entry.to.col);
                from.zip(to)
                    .ok_or_else(|| ServiceError::malformed("history entry off the board"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_move_without_reason_uses_fallback() {
        let body: MutationBody = serde_json::from_str(r#"{"success":false}"#).unwrap();
        let err = body.into_snapshot("Invalid move!").unwrap_err();
        assert_eq!(err.user_message("generic"), "Invalid move!");
    }

    #[test]
    fn success_without_board_is_malformed() {
        let body: MutationBody = serde_json::from_str(
            r#"{"success":true,"gameInfo":{"currentPlayer":"WHITE","gameState":"ACTIVE"}}"#,
        )
        .unwrap();
        let err = body.into_snapshot("Invalid move!").unwrap_err();
        assert!(matches!(err.kind, crate::client::ServiceErrorKind::Malformed(_)));
    }

    #[test]
    fn history_ignores_extra_fields() {
        let body: HistoryBody = serde_json::from_str(
            r#"{"history":[{"from":{"row":6,"col":4},"to":{"row":4,"col":4},"isPromotion":false}]}"#,
        )
        .unwrap();
        let moves = body.into_moves().unwrap();
        assert_eq!(moves, vec![(Square::new(6, 4), Square::new(4, 4))]);
    }
}
