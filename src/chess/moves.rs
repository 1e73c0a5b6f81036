use serde::{Deserialize, Serialize};

use crate::chess::piece::PieceKind;
use crate::core::coord::Coord;
use crate::core::piece::PieceId;
use crate::core::player::Color;

/// Side effect attached to a move beyond "piece goes from `from` to `to`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    None,
    /// The rook moved from `rook_from` to `rook_to` alongside the king.
    Castle {
        rook: PieceId,
        rook_from: Coord,
        rook_to: Coord,
    },
    /// The captured pawn stood on `victim_square`, not on the destination.
    EnPassant { victim_square: Coord },
}

/// One executed ply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub from: Coord,
    pub to: Coord,
    pub captured: Option<PieceId>,
    pub special: Special,
    /// Filled in once a promotion triggered by this move is resolved.
    pub promoted_to: Option<PieceKind>,
}

impl Move {
    /// True for a pawn's initial double step.
    #[inline]
    pub fn is_double_pawn_push(&self) -> bool {
        self.kind == PieceKind::Pawn && (self.to.y - self.from.y).abs() == 2
    }
}

/// Result of [`crate::chess::board::ChessBoard::play`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Played {
    pub mv: Move,
    /// The pawn that reached its last rank and now awaits a replacement kind.
    pub promotion_pending: Option<PieceId>,
}
