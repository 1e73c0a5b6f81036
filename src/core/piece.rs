use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::coord::Coord;
use crate::core::player::Color;

/// Handle into a board's piece arena. Stable for the lifetime of one setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub(crate) usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceState {
    Alive,
    Dead,
    Promoted,
    /// Invalid construction. Registered but inert.
    Error,
    /// Lifted off the board for the duration of a king-safety simulation.
    Suspended,
}

/// Piece kinds usable on a [`crate::core::board::Board`].
pub trait KindLike: Copy + Eq + fmt::Debug {
    /// Material credited to the capturer's side.
    fn value(self) -> u32;
}

/// One piece of the arena.
///
/// `pos` is `Some` iff `state == Alive`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece<K> {
    pub id: PieceId,
    pub kind: K,
    pub owner: Option<Color>,
    pub state: PieceState,
    pub pos: Option<Coord>,
    pub has_moved: bool,
}

impl<K: KindLike> Piece<K> {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == PieceState::Alive
    }

    /// Square of an alive piece.
    #[inline]
    pub fn square(&self) -> Option<Coord> {
        if self.is_alive() {
            self.pos
        } else {
            None
        }
    }

    #[inline]
    pub fn belongs_to(&self, color: Color) -> bool {
        self.owner == Some(color)
    }
}
