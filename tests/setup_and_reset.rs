use chessgame::{
    ChessBoard, Color, Coord, Game, GameConfig, Headless, Phase, PieceKind, PieceState, Players,
};

fn sq(name: &str) -> Coord {
    name.parse().unwrap()
}

fn count(board: &ChessBoard, color: Color, kind: PieceKind) -> usize {
    board.alive(color).filter(|p| p.kind == kind).count()
}

fn play(game: &mut Game<Headless>, from: &str, to: &str) {
    game.select_square(sq(from)).unwrap();
    game.confirm_destination(sq(to)).unwrap();
}

#[test]
fn fresh_setup_has_two_full_armies() {
    let board = ChessBoard::standard(Players::new("w", "b"));
    for color in Color::ALL {
        assert_eq!(count(&board, color, PieceKind::Pawn), 8);
        assert_eq!(count(&board, color, PieceKind::Rook), 2);
        assert_eq!(count(&board, color, PieceKind::Knight), 2);
        assert_eq!(count(&board, color, PieceKind::Bishop), 2);
        assert_eq!(count(&board, color, PieceKind::Queen), 1);
        assert_eq!(count(&board, color, PieceKind::King), 1);
        assert_eq!(board.pieces_by_player(color).count(), 16);
    }
    assert!(board.pieces().all(|p| p.state == PieceState::Alive));
    assert!(board.history().is_empty());
}

#[test]
fn kings_and_queens_start_on_their_files() {
    let board = ChessBoard::standard(Players::new("w", "b"));
    let kind_at = |name: &str| board.piece_at(sq(name)).map(|p| (p.kind, p.owner));

    assert_eq!(kind_at("e1"), Some((PieceKind::King, Some(Color::White))));
    assert_eq!(kind_at("d1"), Some((PieceKind::Queen, Some(Color::White))));
    assert_eq!(kind_at("e8"), Some((PieceKind::King, Some(Color::Black))));
    assert_eq!(kind_at("d8"), Some((PieceKind::Queen, Some(Color::Black))));
    assert_eq!(kind_at("a1"), Some((PieceKind::Rook, Some(Color::White))));
    assert_eq!(kind_at("g8"), Some((PieceKind::Knight, Some(Color::Black))));
    assert_eq!(kind_at("e4"), None);
}

#[test]
fn white_opens_with_twenty_legal_moves() {
    let mut board = ChessBoard::standard(Players::new("w", "b"));
    let ids: Vec<_> = board.alive(Color::White).map(|p| p.id).collect();
    let total: usize = ids
        .into_iter()
        .map(|id| board.legal_moves(id).unwrap().len())
        .sum();
    assert_eq!(total, 20);
}

#[test]
fn new_game_hands_the_move_to_white() {
    let mut game = Game::new(GameConfig::default(), Headless);
    assert_eq!(*game.phase(), Phase::Stopped);
    game.start();
    assert_eq!(*game.phase(), Phase::Select);
    assert_eq!(game.to_move(), Color::White);
    assert_eq!(game.current_player().name, "Player 1");
    assert_eq!(game.pieces_to_render().count(), 32);
}

#[test]
fn consecutive_resets_produce_the_same_fresh_state() {
    let mut game = Game::new(GameConfig::default(), Headless);
    game.start();
    play(&mut game, "e2", "e4");
    play(&mut game, "d7", "d5");
    play(&mut game, "e4", "d5");
    assert_eq!(game.score(Color::White), 1);

    game.reset();
    let first = game.board().clone();
    game.reset();
    let second = game.board().clone();

    assert_eq!(first, second);
    assert_eq!(first, ChessBoard::standard(GameConfig::default().players()));
    assert_eq!(game.to_move(), Color::White);
    assert_eq!(*game.phase(), Phase::Select);
    for color in Color::ALL {
        assert_eq!(game.score(color), 0);
        assert_eq!(game.player(color).moves_played, 0);
    }
    assert!(game.last_move().is_none());
    assert!(game.last_selected_piece().is_none());
}

#[test]
fn reset_discards_dead_and_promoted_pieces() {
    let mut game = Game::new(GameConfig::default(), Headless);
    game.start();
    play(&mut game, "e2", "e4");
    play(&mut game, "d7", "d5");
    play(&mut game, "e4", "d5");
    assert_eq!(game.board().pieces_by_state(PieceState::Dead).count(), 1);

    game.reset();
    assert_eq!(game.board().pieces().count(), 32);
    assert_eq!(game.board().pieces_by_state(PieceState::Dead).count(), 0);
}
