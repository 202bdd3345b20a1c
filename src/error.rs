//! Error types shared by the board, move generator and search.

use crate::board::Move;
use std::fmt;
use thiserror::Error;

/// FEN field that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenField {
    Placement,
    SideToMove,
    Castling,
    EnPassant,
    HalfmoveClock,
    FullmoveNumber,
}

impl fmt::Display for FenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FenField::Placement => "piece placement",
            FenField::SideToMove => "side to move",
            FenField::Castling => "castling",
            FenField::EnPassant => "en passant",
            FenField::HalfmoveClock => "halfmove clock",
            FenField::FullmoveNumber => "fullmove number",
        };
        f.write_str(name)
    }
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    /// Nothing stands on the `from` square.
    EmptySquare,
    /// The move is not in the legal move list of the side to move.
    NotLegal,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::EmptySquare => f.write_str("no piece on the source square"),
            IllegalReason::NotLegal => f.write_str("not a legal move in this position"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("illegal move {mv}: {reason}")]
    IllegalMove { mv: Move, reason: IllegalReason },

    #[error("malformed FEN {field} field: {token:?}")]
    MalformedFen { field: FenField, token: String },

    #[error("malformed move text: {token:?}")]
    MalformedMove { token: String },

    #[error("no legal moves in this position")]
    NoLegalMoves,
}

impl ChessError {
    pub(crate) fn fen(field: FenField, token: &str) -> Self {
        ChessError::MalformedFen {
            field,
            token: token.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChessError>;
