use std::collections::HashSet;

use chessgame::{ChessBoard, Color, Coord, PieceId, PieceKind, Players};

fn sq(name: &str) -> Coord {
    name.parse().unwrap()
}

fn squares(names: &[&str]) -> HashSet<Coord> {
    names.iter().map(|n| sq(n)).collect()
}

fn legal(board: &mut ChessBoard, id: PieceId) -> HashSet<Coord> {
    board.legal_moves(id).unwrap().into_iter().collect()
}

fn empty() -> ChessBoard {
    ChessBoard::empty(Players::new("w", "b"))
}

#[test]
fn knights_jump_over_the_pawn_wall() {
    let mut board = ChessBoard::standard(Players::new("w", "b"));
    let knight = board.id_at(sq("b1")).unwrap();
    assert_eq!(legal(&mut board, knight), squares(&["a3", "c3"]));

    let rook = board.id_at(sq("a1")).unwrap();
    assert!(legal(&mut board, rook).is_empty());
}

#[test]
fn check_must_be_answered() {
    // The rook on e8 checks the white king along the e-file.
    let mut board = empty();
    let king = board.place(PieceKind::King, Color::White, sq("e1"));
    let knight = board.place(PieceKind::Knight, Color::White, sq("b1"));
    let rook = board.place(PieceKind::Rook, Color::White, sq("h3"));
    board.place(PieceKind::Rook, Color::Black, sq("e8"));
    board.place(PieceKind::King, Color::Black, sq("a8"));

    assert!(board.in_check(Color::White).unwrap());
    assert!(legal(&mut board, knight).is_empty());
    assert_eq!(legal(&mut board, rook), squares(&["e3"]));
    assert_eq!(legal(&mut board, king), squares(&["d1", "d2", "f1", "f2"]));
}

#[test]
fn king_may_not_take_a_defended_piece() {
    // The pawn on d2 checks e1 and is covered by the knight on b3.
    let mut board = empty();
    let king = board.place(PieceKind::King, Color::White, sq("e1"));
    board.place(PieceKind::Pawn, Color::Black, sq("d2"));
    board.place(PieceKind::Knight, Color::Black, sq("b3"));
    board.place(PieceKind::King, Color::Black, sq("h8"));

    assert!(board.in_check(Color::White).unwrap());
    assert_eq!(legal(&mut board, king), squares(&["d1", "e2", "f1", "f2"]));
}

#[test]
fn kings_keep_their_distance() {
    let mut board = empty();
    let king = board.place(PieceKind::King, Color::White, sq("e4"));
    board.place(PieceKind::King, Color::Black, sq("e6"));

    let moves = legal(&mut board, king);
    assert_eq!(moves, squares(&["d3", "e3", "f3", "d4", "f4"]));
}

#[test]
fn pinned_bishop_cannot_leave_the_file() {
    let mut board = empty();
    board.place(PieceKind::King, Color::White, sq("e1"));
    let bishop = board.place(PieceKind::Bishop, Color::White, sq("e2"));
    board.place(PieceKind::Rook, Color::Black, sq("e8"));
    board.place(PieceKind::King, Color::Black, sq("a8"));

    assert!(!board.in_check(Color::White).unwrap());
    assert!(legal(&mut board, bishop).is_empty());
}

#[test]
fn no_move_set_ever_contains_a_king_square() {
    // Every piece here lines up on a king; none may list it as a destination.
    let mut board = empty();
    board.place(PieceKind::King, Color::White, sq("e1"));
    board.place(PieceKind::King, Color::Black, sq("e8"));
    board.place(PieceKind::Queen, Color::White, sq("e5"));
    board.place(PieceKind::Knight, Color::White, sq("f6"));
    board.place(PieceKind::Pawn, Color::White, sq("d7"));
    board.place(PieceKind::Bishop, Color::Black, sq("b4"));
    board.place(PieceKind::Rook, Color::Black, sq("a1"));
    board.place(PieceKind::Pawn, Color::Black, sq("f2"));

    let kings: HashSet<Coord> = board
        .pieces_by_kind(PieceKind::King)
        .filter_map(|k| k.square())
        .collect();
    let ids: Vec<PieceId> = board.pieces().map(|p| p.id).collect();
    for id in ids {
        for dest in legal(&mut board, id) {
            assert!(!kings.contains(&dest), "{id} may move onto king square {dest}");
        }
    }
}

#[test]
fn attacked_view_includes_the_enemy_king() {
    let mut board = empty();
    let queen = board.place(PieceKind::Queen, Color::White, sq("a1"));
    board.place(PieceKind::King, Color::Black, sq("a8"));
    board.place(PieceKind::King, Color::White, sq("h1"));

    assert!(board.attacked(queen).unwrap().contains(&sq("a8")));
    assert!(!legal(&mut board, queen).contains(&sq("a8")));
    assert!(board.in_check(Color::Black).unwrap());
}

#[test]
fn dead_pieces_are_transparent_to_move_generation() {
    let mut board = ChessBoard::standard(Players::new("w", "b"));
    let rook = board.id_at(sq("a1")).unwrap();
    let pawn = board.id_at(sq("a2")).unwrap();

    // The b8 knight walks to a2 and takes the pawn there.
    let knight = board.id_at(sq("b8")).unwrap();
    for to in ["c6", "b4", "a2"] {
        board.play(knight, sq(to)).unwrap();
    }
    assert!(!board.get(pawn).unwrap().is_alive());
    assert_eq!(board.players()[Color::Black].score, 1);

    assert_eq!(board.id_at(sq("a2")), Some(knight));
    assert_eq!(legal(&mut board, rook), squares(&["a2"]));
}
