use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::coord::Coord;
use crate::core::piece::{KindLike, Piece};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// A piece on a [`crate::chess::board::ChessBoard`].
pub type ChessPiece = Piece<PieceKind>;

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may turn into.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
    ];

    /// Unit directions for sliding pieces.
    #[inline]
    pub fn slide_dirs(self) -> &'static [Coord] {
        use PieceKind::*;
        match self {
            Queen => &QUEEN_DIRS,
            Rook => &ROOK_DIRS,
            Bishop => &BISHOP_DIRS,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Three-letter tag used by text front-ends.
    pub fn tag(self) -> &'static str {
        match self {
            PieceKind::Pawn => "PWN",
            PieceKind::Rook => "ROK",
            PieceKind::Knight => "KGT",
            PieceKind::Bishop => "BSH",
            PieceKind::Queen => "QEE",
            PieceKind::King => "KNG",
        }
    }
}

/// Prints the three-letter tag.
impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl KindLike for PieceKind {
    #[inline]
    fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Rook => 5,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }
}

pub const ROOK_DIRS: [Coord; 4] = [
    Coord { x: 1, y: 0 },
    Coord { x: -1, y: 0 },
    Coord { x: 0, y: 1 },
    Coord { x: 0, y: -1 },
];

pub const BISHOP_DIRS: [Coord; 4] = [
    Coord { x: 1, y: 1 },
    Coord { x: 1, y: -1 },
    Coord { x: -1, y: 1 },
    Coord { x: -1, y: -1 },
];

pub const QUEEN_DIRS: [Coord; 8] = [
    Coord { x: 1, y: 0 },
    Coord { x: -1, y: 0 },
    Coord { x: 0, y: 1 },
    Coord { x: 0, y: -1 },
    Coord { x: 1, y: 1 },
    Coord { x: 1, y: -1 },
    Coord { x: -1, y: 1 },
    Coord { x: -1, y: -1 },
];

pub const KNIGHT_DELTAS: [Coord; 8] = [
    Coord { x: 2, y: 1 },
    Coord { x: 2, y: -1 },
    Coord { x: -2, y: 1 },
    Coord { x: -2, y: -1 },
    Coord { x: 1, y: 2 },
    Coord { x: 1, y: -2 },
    Coord { x: -1, y: 2 },
    Coord { x: -1, y: -2 },
];
