use std::ops::Deref;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};

use crate::chess::movegen;
use crate::chess::moves::{Move, Played, Special};
use crate::chess::piece::{ChessPiece, PieceKind};
use crate::core::board::Board;
use crate::core::coord::{Bounds, Coord};
use crate::core::piece::{PieceId, PieceState};
use crate::core::player::{Color, Players};
use crate::error::RulesError;

/// Back-rank order, files a..h.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8x8 chess board: the generic [`Board`] plus check detection, move execution and the
/// move history that en passant depends on.
///
/// Cloning yields a full snapshot (pieces, scores, counters, history) that compares by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessBoard {
    base: Board<PieceKind>,
    history: Vec<Move>,
}

impl ChessBoard {
    pub const SIZE: i32 = 8;
    pub const KING_FILE: i32 = 5;

    /// A board with no pieces.
    pub fn empty(players: Players) -> Self {
        Self {
            base: Board::new(Bounds::new(Self::SIZE, Self::SIZE), players),
            history: Vec::new(),
        }
    }

    /// A board in the standard starting position.
    pub fn standard(players: Players) -> Self {
        let mut board = Self::empty(players);
        board.setup_standard();
        board
    }

    /// Discard every piece and the history, zero the counters, and lay out the standard position.
    pub fn reset(&mut self) {
        self.base.players_mut().reset_counters();
        self.setup_standard();
    }

    fn setup_standard(&mut self) {
        self.base.clear();
        self.history.clear();
        for x in 1..=Self::SIZE {
            self.place(PieceKind::Pawn, Color::White, Coord::new(x, 2));
            self.place(PieceKind::Pawn, Color::Black, Coord::new(x, Self::SIZE - 1));
        }
        for (kind, x) in BACK_RANK.into_iter().zip(1..) {
            self.place(kind, Color::White, Coord::new(x, 1));
            self.place(kind, Color::Black, Coord::new(x, Self::SIZE));
        }
    }

    /// Create a piece for `color` on `square`. Check the piece state: placement on an occupied or
    /// off-board square yields [`PieceState::Error`].
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Coord) -> PieceId {
        self.base.spawn(kind, Some(color), square)
    }

    #[inline]
    pub fn players(&self) -> &Players {
        self.base.players()
    }

    #[inline]
    pub fn players_mut(&mut self) -> &mut Players {
        self.base.players_mut()
    }

    /// First rank for white, last for black.
    #[inline]
    pub fn home_rank(&self, color: Color) -> i32 {
        match color {
            Color::White => 1,
            Color::Black => self.bounds().height,
        }
    }

    /// The rank on which a pawn of `color` promotes.
    #[inline]
    pub fn last_rank(&self, color: Color) -> i32 {
        self.home_rank(color.other())
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// Alive pieces, the set a front-end draws.
    pub fn pieces_to_render(&self) -> impl Iterator<Item = &ChessPiece> {
        self.base.pieces_by_state(PieceState::Alive)
    }

    pub fn king(&self, color: Color) -> Result<&ChessPiece, RulesError> {
        self.base
            .alive(color)
            .find(|p| p.kind == PieceKind::King)
            .ok_or(RulesError::KingMissing { color })
    }

    /// Squares the piece threatens (its moves with king safety ignored).
    pub fn attacked(&self, id: PieceId) -> Result<FxHashSet<Coord>, RulesError> {
        Ok(movegen::attacked(self, self.base.piece(id)?))
    }

    /// Is `square` threatened by any alive piece of `by`?
    pub fn square_attacked(&self, square: Coord, by: Color) -> bool {
        self.base
            .alive(by)
            .any(|p| movegen::attacked(self, p).contains(&square))
    }

    /// Is `color`'s king attacked?
    pub fn in_check(&self, color: Color) -> Result<bool, RulesError> {
        let king = self.king(color)?;
        let square = king.pos.ok_or(RulesError::PieceNotAlive { id: king.id })?;
        Ok(self.square_attacked(square, color.other()))
    }

    /// Destinations of `id` that do not leave its own king in check.
    pub fn legal_moves(&mut self, id: PieceId) -> Result<FxHashSet<Coord>, RulesError> {
        let piece = self.base.piece(id)?;
        if !piece.is_alive() {
            return Ok(FxHashSet::default());
        }
        let candidates = movegen::pseudo_moves(self, piece, false);
        let mut out = FxHashSet::default();
        for dest in candidates {
            if !self.leaves_king_in_check(id, dest)? {
                out.insert(dest);
            }
        }
        Ok(out)
    }

    /// Would moving `id` to `dest` leave its owner's king attacked?
    ///
    /// The move is applied to the board, checked, and undone. The undo runs on drop of the
    /// simulation, so it also happens when the check itself fails.
    pub fn leaves_king_in_check(&mut self, id: PieceId, dest: Coord) -> Result<bool, RulesError> {
        let color = self
            .base
            .piece(id)?
            .owner
            .ok_or(RulesError::PieceNotAlive { id })?;
        let sim = Simulation::begin(self, id, dest)?;
        trace!(%id, to = %dest, "simulating move");
        sim.in_check(color)
    }

    /// Does `color` have at least one legal move?
    pub fn has_legal_move(&mut self, color: Color) -> Result<bool, RulesError> {
        let ids: Vec<PieceId> = self.base.alive(color).map(|p| p.id).collect();
        for id in ids {
            if !self.legal_moves(id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn is_checkmate(&mut self, color: Color) -> Result<bool, RulesError> {
        Ok(self.in_check(color)? && !self.has_legal_move(color)?)
    }

    pub fn is_stalemate(&mut self, color: Color) -> Result<bool, RulesError> {
        Ok(!self.in_check(color)? && !self.has_legal_move(color)?)
    }

    /// The piece an en-passant move by `pawn` to `dest` would remove, if the move is one.
    fn en_passant_victim(&self, pawn: &ChessPiece, dest: Coord) -> Option<Coord> {
        let from = pawn.square()?;
        (pawn.kind == PieceKind::Pawn && dest.x != from.x && self.piece_at(dest).is_none())
            .then_some(Coord::new(dest.x, from.y))
    }

    /// Execute a move, including its castling/en-passant side effects, and record it.
    ///
    /// Legality is the caller's business; this only enforces the contract of the move itself.
    /// All preconditions are checked before anything changes. A pawn reaching its last rank is
    /// reported in [`Played::promotion_pending`] and must be resolved with [`ChessBoard::promote`].
    pub fn play(&mut self, id: PieceId, dest: Coord) -> Result<Played, RulesError> {
        let piece = self.base.piece(id)?.clone();
        let (Some(from), Some(color)) = (piece.square(), piece.owner) else {
            return Err(RulesError::PieceNotAlive { id });
        };
        if !self.on_board(dest) {
            return Err(RulesError::OffBoard { square: dest });
        }
        if self.piece_at(dest).is_some_and(|p| p.belongs_to(color)) {
            return Err(RulesError::FriendlyOccupied { square: dest });
        }

        let mut special = Special::None;
        if piece.kind == PieceKind::King && (dest - from).x.abs() > 1 {
            let step = (dest.x - from.x).signum();
            let rook_file = if step > 0 { self.bounds().width } else { 1 };
            let rook_from = Coord::new(rook_file, from.y);
            let rook = self
                .piece_at(rook_from)
                .filter(|r| r.kind == PieceKind::Rook && r.belongs_to(color) && !r.has_moved)
                .map(|r| r.id);
            let Some(rook) = rook else {
                warn!(%color, square = %rook_from, "castling without an unmoved rook");
                return Err(RulesError::CastlingRookUnavailable {
                    color,
                    rook_square: rook_from,
                });
            };
            special = Special::Castle {
                rook,
                rook_from,
                rook_to: Coord::new(from.x + step, from.y),
            };
        } else if let Some(victim_square) = self.en_passant_victim(&piece, dest) {
            let victim_ok = self.piece_at(victim_square).is_some_and(|v| {
                v.kind == PieceKind::Pawn && v.belongs_to(color.other())
            });
            if !victim_ok {
                warn!(%color, square = %victim_square, "en passant without a victim");
                return Err(RulesError::EnPassantVictimMissing {
                    square: victim_square,
                });
            }
            special = Special::EnPassant { victim_square };
        }

        let mut captured = None;
        match special {
            Special::Castle { rook, rook_to, .. } => {
                self.base.relocate(rook, rook_to)?;
            }
            Special::EnPassant { victim_square } => {
                if let Some(victim) = self.base.id_at(victim_square) {
                    self.base.capture(victim, color)?;
                    captured = Some(victim);
                }
            }
            Special::None => {}
        }
        captured = self.base.relocate(id, dest)?.or(captured);

        let mv = Move {
            piece: id,
            kind: piece.kind,
            color,
            from,
            to: dest,
            captured,
            special,
            promoted_to: None,
        };
        trace!(?mv, "played");
        self.history.push(mv.clone());

        let promotion_pending =
            (piece.kind == PieceKind::Pawn && dest.y == self.last_rank(color)).then_some(id);
        Ok(Played {
            mv,
            promotion_pending,
        })
    }

    /// Replace a pawn standing on its last rank by a new piece of `kind`.
    ///
    /// The pawn becomes [`PieceState::Promoted`]; the new piece belongs to the same player,
    /// stands on the same square, and counts as having moved.
    pub fn promote(&mut self, pawn: PieceId, kind: PieceKind) -> Result<PieceId, RulesError> {
        if !kind.is_promotion_target() {
            warn!(?kind, "promotion to an invalid kind");
            return Err(RulesError::InvalidPromotion { kind });
        }
        let piece = self.base.piece(pawn)?;
        let (Some(square), Some(color)) = (piece.square(), piece.owner) else {
            return Err(RulesError::NotPromotable { id: pawn });
        };
        if piece.kind != PieceKind::Pawn || square.y != self.last_rank(color) {
            return Err(RulesError::NotPromotable { id: pawn });
        }

        self.base.set_state(pawn, PieceState::Promoted)?;
        let new_id = self.place(kind, color, square);
        self.base.piece_mut(new_id)?.has_moved = true;
        if let Some(last) = self.history.last_mut().filter(|m| m.piece == pawn) {
            last.promoted_to = Some(kind);
        }
        info!(%color, ?kind, %square, "pawn promoted");
        Ok(new_id)
    }
}

impl Deref for ChessBoard {
    type Target = Board<PieceKind>;

    #[inline]
    fn deref(&self) -> &Board<PieceKind> {
        &self.base
    }
}

/// A move applied tentatively for a king-safety check.
///
/// Any captured piece (including an en-passant victim) is lifted off as
/// [`PieceState::Suspended`]. Dropping the simulation puts every touched piece back exactly as it
/// was.
struct Simulation<'a> {
    board: &'a mut ChessBoard,
    mover: PieceId,
    mover_pos: Option<Coord>,
    lifted: Option<(PieceId, PieceState, Option<Coord>)>,
}

impl<'a> Simulation<'a> {
    fn begin(board: &'a mut ChessBoard, mover: PieceId, dest: Coord) -> Result<Self, RulesError> {
        let piece = board.base.piece(mover)?.clone();
        if !piece.is_alive() {
            return Err(RulesError::PieceNotAlive { id: mover });
        }
        let victim = match board.piece_at(dest) {
            Some(p) if p.id != mover => Some(p.id),
            Some(_) => None,
            None => board
                .en_passant_victim(&piece, dest)
                .and_then(|sq| board.base.id_at(sq)),
        };

        let mut sim = Simulation {
            board,
            mover,
            mover_pos: piece.pos,
            lifted: None,
        };
        if let Some(victim) = victim {
            let v = sim.board.base.piece(victim)?;
            sim.lifted = Some((victim, v.state, v.pos));
            sim.board
                .base
                .restore(victim, PieceState::Suspended, None)?;
        }
        sim.board
            .base
            .restore(mover, PieceState::Alive, Some(dest))?;
        Ok(sim)
    }
}

impl Deref for Simulation<'_> {
    type Target = ChessBoard;

    fn deref(&self) -> &ChessBoard {
        &*self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let base = &mut self.board.base;
        if let Err(e) = base.restore(self.mover, PieceState::Alive, self.mover_pos) {
            warn!(error = %e, "failed to restore simulated mover");
        }
        if let Some((id, state, pos)) = self.lifted.take() {
            if let Err(e) = base.restore(id, state, pos) {
                warn!(error = %e, "failed to restore suspended piece");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Coord {
        name.parse().unwrap()
    }

    fn players() -> Players {
        Players::new("w", "b")
    }

    #[test]
    fn simulation_leaves_the_board_untouched() {
        let mut b = ChessBoard::empty(players());
        b.place(PieceKind::King, Color::White, sq("e1"));
        b.place(PieceKind::King, Color::Black, sq("e8"));
        let rook = b.place(PieceKind::Rook, Color::White, sq("e2"));
        b.place(PieceKind::Queen, Color::Black, sq("e5"));
        b.place(PieceKind::Knight, Color::Black, sq("a2"));

        let before = b.clone();
        for dest in ["e5", "a2", "d2", "e3"] {
            b.leaves_king_in_check(rook, sq(dest)).unwrap();
            assert_eq!(b, before, "board changed after simulating {dest}");
        }
    }

    #[test]
    fn en_passant_simulation_restores_the_victim() {
        let mut b = ChessBoard::empty(players());
        b.place(PieceKind::King, Color::White, sq("a5"));
        b.place(PieceKind::King, Color::Black, sq("h8"));
        let pawn = b.place(PieceKind::Pawn, Color::White, sq("b5"));
        let victim = b.place(PieceKind::Pawn, Color::Black, sq("c7"));
        b.place(PieceKind::Rook, Color::Black, sq("h5"));
        b.play(victim, sq("c5")).unwrap();

        let before = b.clone();
        assert!(b.leaves_king_in_check(pawn, sq("c6")).unwrap());
        assert_eq!(b, before);
        assert!(!b.leaves_king_in_check(pawn, sq("b6")).unwrap());
        assert_eq!(b, before);
        assert_eq!(b.id_at(sq("c5")), Some(victim));
    }

    #[test]
    fn pinned_rook_may_only_slide_along_the_pin() {
        let mut b = ChessBoard::empty(players());
        b.place(PieceKind::King, Color::White, sq("e1"));
        b.place(PieceKind::King, Color::Black, sq("a8"));
        let rook = b.place(PieceKind::Rook, Color::White, sq("e2"));
        b.place(PieceKind::Queen, Color::Black, sq("e5"));

        let moves = b.legal_moves(rook).unwrap();
        let expected: FxHashSet<Coord> = ["e3", "e4", "e5"].iter().map(|s| sq(s)).collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn check_detection_sees_through_dead_pieces() {
        let mut b = ChessBoard::empty(players());
        b.place(PieceKind::King, Color::White, sq("e1"));
        b.place(PieceKind::King, Color::Black, sq("h8"));
        let blocker = b.place(PieceKind::Pawn, Color::White, sq("e4"));
        b.place(PieceKind::Rook, Color::Black, sq("e7"));

        assert!(!b.in_check(Color::White).unwrap());
        b.base.set_state(blocker, PieceState::Dead).unwrap();
        assert!(b.in_check(Color::White).unwrap());
    }

    #[test]
    fn missing_king_is_reported() {
        let mut b = ChessBoard::empty(players());
        b.place(PieceKind::King, Color::White, sq("e1"));
        assert_eq!(
            b.in_check(Color::Black),
            Err(RulesError::KingMissing {
                color: Color::Black
            })
        );
    }

    #[test]
    fn promotion_rejects_king_and_pawn() {
        let mut b = ChessBoard::empty(players());
        let pawn = b.place(PieceKind::Pawn, Color::White, sq("a8"));
        for kind in [PieceKind::King, PieceKind::Pawn] {
            assert_eq!(
                b.promote(pawn, kind),
                Err(RulesError::InvalidPromotion { kind })
            );
        }
        assert!(b.piece(pawn).unwrap().is_alive());
    }

    #[test]
    fn only_pawns_on_the_last_rank_promote() {
        let mut b = ChessBoard::empty(players());
        let pawn = b.place(PieceKind::Pawn, Color::White, sq("a7"));
        let rook = b.place(PieceKind::Rook, Color::Black, sq("h1"));
        assert_eq!(
            b.promote(pawn, PieceKind::Queen),
            Err(RulesError::NotPromotable { id: pawn })
        );
        assert_eq!(
            b.promote(rook, PieceKind::Queen),
            Err(RulesError::NotPromotable { id: rook })
        );
    }

    #[test]
    fn snapshot_survives_json() {
        let mut b = ChessBoard::standard(players());
        let pawn = b.id_at(sq("e2")).unwrap();
        b.play(pawn, sq("e4")).unwrap();

        let json = serde_json::to_string(&b).unwrap();
        let back: ChessBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert_eq!(back.last_move().map(|m| m.to), Some(sq("e4")));
    }
}
