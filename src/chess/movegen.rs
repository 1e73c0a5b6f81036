//! Pseudo-legal move generation, one generator per [`PieceKind`].
//!
//! Generators only look at the board; filtering out moves that expose the mover's king is done
//! by [`ChessBoard::legal_moves`] through the king-safety simulation.
//!
//! `ignore_king_safety` also governs how enemy kings are treated: when it is set (the
//! attacked-squares view) an enemy king is a reachable target, otherwise it blocks like a friendly
//! piece because kings are never captured.

use rustc_hash::FxHashSet;

use crate::chess::board::ChessBoard;
use crate::chess::piece::{ChessPiece, PieceKind, KNIGHT_DELTAS};
use crate::core::coord::{Coord, KING_STEPS};
use crate::core::player::Color;

/// Destinations ignoring whether the mover's own king ends up in check.
pub fn pseudo_moves(
    board: &ChessBoard,
    piece: &ChessPiece,
    ignore_king_safety: bool,
) -> FxHashSet<Coord> {
    let (Some(from), Some(color)) = (piece.square(), piece.owner) else {
        return FxHashSet::default();
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece, from, color),
        PieceKind::Knight => step_moves(board, from, color, &KNIGHT_DELTAS, ignore_king_safety),
        PieceKind::King => king_moves(board, piece, from, color, ignore_king_safety),
        PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen => {
            slide_moves(board, from, color, piece.kind.slide_dirs(), ignore_king_safety)
        }
    }
}

/// Squares this piece threatens.
///
/// Pawns threaten their forward diagonals whether or not anything stands there, and kings
/// threaten their eight neighbours without castling.
pub fn attacked(board: &ChessBoard, piece: &ChessPiece) -> FxHashSet<Coord> {
    let (Some(from), Some(color)) = (piece.square(), piece.owner) else {
        return FxHashSet::default();
    };
    match piece.kind {
        PieceKind::Pawn => pawn_diagonals(board, from, color).collect(),
        PieceKind::King => step_moves(board, from, color, &KING_STEPS, true),
        _ => pseudo_moves(board, piece, true),
    }
}

/// Can a `color` piece end its move on `to`?
#[inline]
fn can_land(board: &ChessBoard, color: Color, to: Coord, ignore_king_safety: bool) -> bool {
    if !board.on_board(to) {
        return false;
    }
    match board.piece_at(to) {
        None => true,
        Some(p) if p.belongs_to(color) => false,
        Some(p) => ignore_king_safety || p.kind != PieceKind::King,
    }
}

fn step_moves(
    board: &ChessBoard,
    from: Coord,
    color: Color,
    deltas: &[Coord],
    ignore_king_safety: bool,
) -> FxHashSet<Coord> {
    deltas
        .iter()
        .map(|&d| from + d)
        .filter(|&to| can_land(board, color, to, ignore_king_safety))
        .collect()
}

fn slide_moves(
    board: &ChessBoard,
    from: Coord,
    color: Color,
    dirs: &[Coord],
    ignore_king_safety: bool,
) -> FxHashSet<Coord> {
    let mut out = FxHashSet::default();
    for &dir in dirs {
        for to in board.bounds().ray(from, dir) {
            match board.piece_at(to) {
                None => {
                    out.insert(to);
                }
                Some(_) => {
                    if can_land(board, color, to, ignore_king_safety) {
                        out.insert(to);
                    }
                    break;
                }
            }
        }
    }
    out
}

fn king_moves(
    board: &ChessBoard,
    king: &ChessPiece,
    from: Coord,
    color: Color,
    ignore_king_safety: bool,
) -> FxHashSet<Coord> {
    let mut out = step_moves(board, from, color, &KING_STEPS, ignore_king_safety);
    out.extend(castling_moves(board, king, from, color));
    out
}

/// King destinations for castling on either wing.
///
/// Requires an unmoved king on its home square, an unmoved own rook in the corner, empty
/// squares between them, and no attacked square on the king's path (its current square
/// included).
pub fn castling_moves(
    board: &ChessBoard,
    king: &ChessPiece,
    from: Coord,
    color: Color,
) -> Vec<Coord> {
    let home = board.home_rank(color);
    if king.has_moved || from != Coord::new(ChessBoard::KING_FILE, home) {
        return Vec::new();
    }

    let width = board.bounds().width;
    let enemy = color.other();
    let mut out = Vec::with_capacity(2);
    for (rook_file, step) in [(width, 1), (1, -1)] {
        let rook_ok = board
            .piece_at(Coord::new(rook_file, home))
            .is_some_and(|r| r.kind == PieceKind::Rook && r.belongs_to(color) && !r.has_moved);
        if !rook_ok {
            continue;
        }

        let between_empty = files_between(from.x, rook_file)
            .all(|x| board.piece_at(Coord::new(x, home)).is_none());
        if !between_empty {
            continue;
        }

        let dir = Coord::new(step, 0);
        let to = from + dir * 2;
        let path_safe = (0..=2)
            .map(|i| from + dir * i)
            .all(|sq| !board.square_attacked(sq, enemy));
        if path_safe {
            out.push(to);
        }
    }
    out
}

fn files_between(a: i32, b: i32) -> impl Iterator<Item = i32> {
    (a.min(b) + 1)..a.max(b)
}

fn pawn_diagonals(
    board: &ChessBoard,
    from: Coord,
    color: Color,
) -> impl Iterator<Item = Coord> + '_ {
    let dy = color.forward();
    [Coord::new(-1, dy), Coord::new(1, dy)]
        .into_iter()
        .map(move |d| from + d)
        .filter(move |&to| board.on_board(to))
}

fn pawn_moves(
    board: &ChessBoard,
    pawn: &ChessPiece,
    from: Coord,
    color: Color,
) -> FxHashSet<Coord> {
    let mut out = FxHashSet::default();
    let forward = Coord::new(0, color.forward());

    let one = from + forward;
    if board.on_board(one) && board.piece_at(one).is_none() {
        out.insert(one);
        let two = from + forward * 2;
        let on_start_rank = from.y == board.home_rank(color) + color.forward();
        if !pawn.has_moved
            && on_start_rank
            && board.on_board(two)
            && board.piece_at(two).is_none()
        {
            out.insert(two);
        }
    }

    for to in pawn_diagonals(board, from, color) {
        if board
            .piece_at(to)
            .is_some_and(|p| !p.belongs_to(color) && p.kind != PieceKind::King)
        {
            out.insert(to);
        }
    }

    if let Some(to) = en_passant_target(board, from, color) {
        out.insert(to);
    }
    out
}

/// The en-passant destination available to a `color` pawn on `from`, if any.
///
/// Only right after an adjacent enemy pawn's double step, and only from the fifth rank.
pub fn en_passant_target(board: &ChessBoard, from: Coord, color: Color) -> Option<Coord> {
    let fifth_rank = board.home_rank(color) + 4 * color.forward();
    if from.y != fifth_rank {
        return None;
    }
    let last = board.last_move()?;
    if last.color == color || !last.is_double_pawn_push() {
        return None;
    }
    if last.to.y != from.y || (last.to.x - from.x).abs() != 1 {
        return None;
    }
    let victim_in_place = board
        .piece_at(last.to)
        .is_some_and(|p| p.id == last.piece);
    victim_in_place.then(|| Coord::new(last.to.x, from.y + color.forward()))
}
