use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::coord::{Bounds, Coord};
use crate::core::piece::{KindLike, Piece, PieceId, PieceState};
use crate::core::player::{Color, Players};
use crate::error::RulesError;

/// Rectangular occupancy model with no knowledge of how pieces move.
///
/// The arena keeps every piece created since the last [`Board::clear`]. Captured and promoted
/// pieces are deactivated rather than removed, so [`PieceId`]s stay valid; every square query
/// looks through non-alive pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board<K> {
    bounds: Bounds,
    pieces: Vec<Piece<K>>,
    players: Players,
}

impl<K: KindLike> Board<K> {
    pub fn new(bounds: Bounds, players: Players) -> Self {
        Self {
            bounds,
            pieces: Vec::new(),
            players,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn on_board(&self, c: Coord) -> bool {
        self.bounds.contains(c)
    }

    /// In bounds and unoccupied. Used for construction only: captures land on occupied squares.
    #[inline]
    pub fn placement_valid(&self, c: Coord) -> bool {
        self.on_board(c) && self.piece_at(c).is_none()
    }

    /// The alive occupant of `c`, if any.
    pub fn piece_at(&self, c: Coord) -> Option<&Piece<K>> {
        self.pieces.iter().find(|p| p.square() == Some(c))
    }

    #[inline]
    pub fn id_at(&self, c: Coord) -> Option<PieceId> {
        self.piece_at(c).map(|p| p.id)
    }

    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece<K>> {
        self.pieces.get(id.0)
    }

    pub fn piece(&self, id: PieceId) -> Result<&Piece<K>, RulesError> {
        self.get(id).ok_or(RulesError::UnknownPiece { id })
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Result<&mut Piece<K>, RulesError> {
        self.pieces.get_mut(id.0).ok_or(RulesError::UnknownPiece { id })
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece<K>> {
        self.pieces.iter()
    }

    pub fn pieces_by_player(&self, color: Color) -> impl Iterator<Item = &Piece<K>> {
        self.pieces.iter().filter(move |p| p.belongs_to(color))
    }

    pub fn pieces_by_state(&self, state: PieceState) -> impl Iterator<Item = &Piece<K>> {
        self.pieces.iter().filter(move |p| p.state == state)
    }

    pub fn pieces_by_kind(&self, kind: K) -> impl Iterator<Item = &Piece<K>> {
        self.pieces.iter().filter(move |p| p.kind == kind)
    }

    /// Alive pieces owned by `color`.
    pub fn alive(&self, color: Color) -> impl Iterator<Item = &Piece<K>> {
        self.pieces
            .iter()
            .filter(move |p| p.is_alive() && p.belongs_to(color))
    }

    #[inline]
    pub fn players(&self) -> &Players {
        &self.players
    }

    #[inline]
    pub fn players_mut(&mut self) -> &mut Players {
        &mut self.players
    }

    /// Register a new piece.
    ///
    /// A missing owner or an invalid placement yields a piece in [`PieceState::Error`]; the caller
    /// must check the state of the returned piece.
    pub fn spawn(&mut self, kind: K, owner: Option<Color>, pos: Coord) -> PieceId {
        let id = PieceId(self.pieces.len());
        let valid = owner.is_some() && self.placement_valid(pos);
        if !valid {
            warn!(
                ?kind,
                ?owner,
                square = %pos,
                "piece cannot be created here; registering it in error state"
            );
        }
        self.pieces.push(Piece {
            id,
            kind,
            owner,
            state: if valid {
                PieceState::Alive
            } else {
                PieceState::Error
            },
            pos: valid.then_some(pos),
            has_moved: false,
        });
        id
    }

    /// Change a piece's state. Leaving `Alive` clears the position.
    pub fn set_state(&mut self, id: PieceId, state: PieceState) -> Result<(), RulesError> {
        let piece = self.piece_mut(id)?;
        piece.state = state;
        if state != PieceState::Alive {
            piece.pos = None;
        }
        Ok(())
    }

    /// Kill `victim` and credit its material to `capturer`.
    pub fn capture(&mut self, victim: PieceId, capturer: Color) -> Result<(), RulesError> {
        let value = self.piece(victim)?.kind.value();
        self.set_state(victim, PieceState::Dead)?;
        self.players[capturer].score += value;
        trace!(%victim, %capturer, value, "captured");
        Ok(())
    }

    /// Move an alive piece to `dest`, capturing any enemy occupant first.
    ///
    /// Returns the captured piece. `dest` must be on the board and not hold a friendly piece.
    pub fn relocate(&mut self, id: PieceId, dest: Coord) -> Result<Option<PieceId>, RulesError> {
        let mover = self.piece(id)?;
        if !mover.is_alive() {
            return Err(RulesError::PieceNotAlive { id });
        }
        let Some(color) = mover.owner else {
            return Err(RulesError::PieceNotAlive { id });
        };
        if !self.on_board(dest) {
            return Err(RulesError::OffBoard { square: dest });
        }

        let captured = match self.piece_at(dest) {
            Some(occupant) if occupant.id == id => return Ok(None),
            Some(occupant) if occupant.belongs_to(color) => {
                return Err(RulesError::FriendlyOccupied { square: dest });
            }
            Some(occupant) => Some(occupant.id),
            None => None,
        };

        if let Some(victim) = captured {
            self.capture(victim, color)?;
        }
        let piece = self.piece_mut(id)?;
        piece.pos = Some(dest);
        piece.has_moved = true;
        Ok(captured)
    }

    /// Overwrite state and position verbatim, with no scoring side effects.
    pub(crate) fn restore(
        &mut self,
        id: PieceId,
        state: PieceState,
        pos: Option<Coord>,
    ) -> Result<(), RulesError> {
        let piece = self.piece_mut(id)?;
        piece.state = state;
        piece.pos = pos;
        Ok(())
    }

    /// Drop every piece. Players are kept.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }
}
