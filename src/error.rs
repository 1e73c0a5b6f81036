use thiserror::Error;

use crate::chess::piece::PieceKind;
use crate::core::coord::Coord;
use crate::core::piece::PieceId;
use crate::core::player::Color;

/// Contract violations and precondition failures raised by the engine.
///
/// Rejected player input (an empty square, an illegal destination) is not an error; the game
/// state machine re-prompts instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("no piece with id {id}")]
    UnknownPiece { id: PieceId },

    #[error("piece {id} is not on the board")]
    PieceNotAlive { id: PieceId },

    #[error("square {square} is off the board")]
    OffBoard { square: Coord },

    #[error("square {square} holds a friendly piece")]
    FriendlyOccupied { square: Coord },

    #[error("'{text}' is not a square name")]
    InvalidSquare { text: String },

    /// Castling was executed without an unmoved own rook in the corner.
    #[error("cannot castle: no unmoved {color} rook on {rook_square}")]
    CastlingRookUnavailable { color: Color, rook_square: Coord },

    /// An en-passant capture found no enemy pawn behind the destination.
    #[error("cannot capture en passant: no enemy pawn on {square}")]
    EnPassantVictimMissing { square: Coord },

    #[error("cannot promote to {kind}")]
    InvalidPromotion { kind: PieceKind },

    #[error("piece {id} is not a pawn on its last rank")]
    NotPromotable { id: PieceId },

    #[error("{color} has no king on the board")]
    KingMissing { color: Color },

    #[error("{operation} is not allowed while the game is {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: &'static str,
    },
}

/// Failures loading a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
