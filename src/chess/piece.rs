//! Sides, piece kinds and the two-letter piece codes used on the wire.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the two players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Side {
    /// White moves first.
    White,
    /// Black.
    Black,
}

impl Side {
    /// Prefix letter used in piece codes.
    pub fn prefix(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }

    /// Parses a piece-code prefix letter.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'W' => Some(Side::White),
            'B' => Some(Side::Black),
            _ => None,
        }
    }
}

/// Kind of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Kind {
    /// King.
    King,
    /// Queen.
    Queen,
    /// Rook.
    Rook,
    /// Bishop.
    Bishop,
    /// Knight.
    Knight,
    /// Pawn.
    Pawn,
}

impl Kind {
    /// Letter used in piece codes.
    pub fn letter(self) -> char {
        match self {
            Kind::King => 'K',
            Kind::Queen => 'Q',
            Kind::Rook => 'R',
            Kind::Bishop => 'B',
            Kind::Knight => 'N',
            Kind::Pawn => 'P',
        }
    }

    /// Parses a piece-code kind letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'K' => Some(Kind::King),
            'Q' => Some(Kind::Queen),
            'R' => Some(Kind::Rook),
            'B' => Some(Kind::Bishop),
            'N' => Some(Kind::Knight),
            'P' => Some(Kind::Pawn),
            _ => None,
        }
    }
}

/// A recognized piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    /// Owner.
    pub side: Side,
    /// Kind.
    pub kind: Kind,
}

impl Piece {
    /// Creates a piece.
    pub fn new(side: Side, kind: Kind) -> Self {
        Self { side, kind }
    }

    /// Unicode chess glyph.
    pub fn glyph(self) -> char {
        match (self.side, self.kind) {
            (Side::White, Kind::King) => '♔',
            (Side::White, Kind::Queen) => '♕',
            (Side::White, Kind::Rook) => '♖',
            (Side::White, Kind::Bishop) => '♗',
            (Side::White, Kind::Knight) => '♘',
            (Side::White, Kind::Pawn) => '♙',
            (Side::Black, Kind::King) => '♚',
            (Side::Black, Kind::Queen) => '♛',
            (Side::Black, Kind::Rook) => '♜',
            (Side::Black, Kind::Bishop) => '♝',
            (Side::Black, Kind::Knight) => '♞',
            (Side::Black, Kind::Pawn) => '♟',
        }
    }

    /// Two-letter wire code, e.g. `WK`.
    pub fn code(self) -> PieceCode {
        PieceCode(format!("{}{}", self.side.prefix(), self.kind.letter()))
    }
}

/// Piece code exactly as the service sent it.
///
/// Codes are kept verbatim so that a code this client does not know about
/// still reaches the renderer, which shows it as an unknown piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceCode(String);

impl PieceCode {
    /// Wraps a raw code.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owning side, read from the prefix letter alone.
    pub fn side(&self) -> Option<Side> {
        self.0.chars().next().and_then(Side::from_prefix)
    }

    /// The piece, if the whole code is recognized.
    pub fn piece(&self) -> Option<Piece> {
        let mut chars = self.0.chars();
        let side = chars.next().and_then(Side::from_prefix)?;
        let kind = chars.next().and_then(Kind::from_letter)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Piece::new(side, kind))
    }
}

impl std::fmt::Display for PieceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_piece_code_parses_back() {
        for side in Side::iter() {
            for kind in Kind::iter() {
                let piece = Piece::new(side, kind);
                assert_eq!(piece.code().piece(), Some(piece));
            }
        }
    }

    #[test]
    fn unknown_kind_keeps_side() {
        let code = PieceCode::new("WX");
        assert_eq!(code.piece(), None);
        assert_eq!(code.side(), Some(Side::White));
    }

    #[test]
    fn side_uses_uppercase_names() {
        assert_eq!(Side::White.to_string(), "WHITE");
        assert_eq!("BLACK".parse::<Side>().unwrap(), Side::Black);
    }
}
