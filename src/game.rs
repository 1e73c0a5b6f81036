//! Turn order and the select → confirm move protocol.
//!
//! ```text
//! Stopped --start--> Select --own piece--> Confirm --legal destination--> (apply move)
//!                      ^  \--anything else--/  |  \--cancel / bad square--> Select
//!                      |                       |
//!                      |     pawn on last rank +--> AwaitingPromotion --choose_promotion--+
//!                      |                                                                 |
//!                      +------------- next player <--- evaluate (mate / stalemate / check) <-+
//!                                                           \--> GameOver --reset--> Select
//! ```
//!
//! All presentation goes through a [`Presenter`]. A game is single-threaded state; hosts that
//! share one across threads wrap it in a mutex.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chess::board::ChessBoard;
use crate::chess::moves::Move;
use crate::chess::piece::{ChessPiece, PieceKind};
use crate::config::GameConfig;
use crate::core::coord::Coord;
use crate::core::piece::PieceId;
use crate::core::player::{Color, Player};
use crate::error::RulesError;

/// The presentation side of a game: rendering, prompts and notifications.
///
/// Every method has a no-op default so front-ends implement only what they show.
pub trait Presenter {
    /// Called once, before anything is drawn.
    fn init(&mut self) {}

    /// Render the board. Called after every applied move and after terminal declarations.
    fn draw(&mut self, _board: &ChessBoard) {}

    /// `player` should pick a square holding one of their pieces.
    fn ask_for_move(&mut self, _player: &Player) {}

    /// `piece` is selected; `moves` are its legal destinations. Answer with
    /// [`Game::confirm_destination`] or [`Game::cancel`].
    fn display_legal_moves(&mut self, _piece: &ChessPiece, _moves: &FxHashSet<Coord>) {}

    /// `pawn` reached its last rank. Return the replacement kind now, or `None` to answer later
    /// through [`Game::choose_promotion`].
    fn ask_for_promotion(&mut self, _pawn: &ChessPiece) -> Option<PieceKind> {
        None
    }

    fn declare_winner(&mut self, _player: &Player) {}

    fn declare_draw(&mut self) {}

    /// `player`'s king is in check.
    fn tell_check(&mut self, _player: &Player) {}
}

/// A presenter that shows nothing and always promotes to a queen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Presenter for Headless {
    fn ask_for_promotion(&mut self, _pawn: &ChessPiece) -> Option<PieceKind> {
        Some(PieceKind::Queen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Color),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Not started, or stopped. Input is ignored.
    Stopped,
    /// Waiting for the player to move to pick one of their pieces.
    Select,
    /// `piece` is picked; waiting for one of `legal` or a cancellation.
    Confirm {
        piece: PieceId,
        legal: FxHashSet<Coord>,
    },
    /// The move is applied but `pawn` still needs its replacement kind.
    AwaitingPromotion { pawn: PieceId },
    GameOver(Outcome),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Stopped => "stopped",
            Phase::Select => "selecting",
            Phase::Confirm { .. } => "confirming",
            Phase::AwaitingPromotion { .. } => "awaiting promotion",
            Phase::GameOver(_) => "over",
        }
    }
}

pub struct Game<P> {
    board: ChessBoard,
    to_move: Color,
    phase: Phase,
    last_selected: Option<PieceId>,
    presenter: P,
}

impl<P: Presenter> Game<P> {
    /// Set up a fresh board. The game stays [`Phase::Stopped`] until [`Game::start`].
    pub fn new(config: GameConfig, mut presenter: P) -> Self {
        presenter.init();
        Self {
            board: ChessBoard::standard(config.players()),
            to_move: Color::White,
            phase: Phase::Stopped,
            last_selected: None,
            presenter,
        }
    }

    /// Continue from an arbitrary position with `to_move` to play. Stays [`Phase::Stopped`] until
    /// [`Game::start`]; a later [`Game::reset`] goes back to the standard position.
    pub fn with_board(board: ChessBoard, to_move: Color, mut presenter: P) -> Self {
        presenter.init();
        Self {
            board,
            to_move,
            phase: Phase::Stopped,
            last_selected: None,
            presenter,
        }
    }

    pub fn start(&mut self) {
        if self.phase != Phase::Stopped {
            debug!(phase = self.phase.name(), "start ignored");
            return;
        }
        info!(to_move = %self.to_move, "game started");
        self.phase = Phase::Select;
        self.presenter.draw(&self.board);
        self.prompt();
    }

    /// Pause input handling. A pending selection is dropped; the position is kept.
    pub fn stop(&mut self) -> Result<(), RulesError> {
        match self.phase {
            Phase::AwaitingPromotion { .. } => Err(self.wrong_phase("stop")),
            Phase::GameOver(_) => Ok(()),
            _ => {
                self.phase = Phase::Stopped;
                Ok(())
            }
        }
    }

    /// Rebuild the standard position, zero scores and move counts, and hand the move to white.
    pub fn reset(&mut self) {
        self.board.reset();
        self.to_move = Color::White;
        self.last_selected = None;
        self.phase = Phase::Select;
        info!("game reset");
        self.presenter.draw(&self.board);
        self.prompt();
    }

    /// Pick the piece to move. Anything but a square holding a piece of the player to move
    /// re-prompts.
    pub fn select_square(&mut self, square: Coord) -> Result<(), RulesError> {
        if !matches!(self.phase, Phase::Select | Phase::Confirm { .. }) {
            debug!(phase = self.phase.name(), %square, "selection ignored");
            return Ok(());
        }

        let own = self
            .board
            .piece_at(square)
            .filter(|p| p.belongs_to(self.to_move))
            .map(|p| p.id);
        let Some(id) = own else {
            debug!(%square, player = %self.to_move, "no own piece selected");
            self.phase = Phase::Select;
            self.prompt();
            return Ok(());
        };

        let legal = self.board.legal_moves(id)?;
        self.last_selected = Some(id);
        self.presenter
            .display_legal_moves(self.board.piece(id)?, &legal);
        self.phase = Phase::Confirm { piece: id, legal };
        Ok(())
    }

    /// Complete the selected move. A square outside the legal set re-displays the legal moves,
    /// unless it holds another own piece, which then becomes the selection.
    pub fn confirm_destination(&mut self, dest: Coord) -> Result<(), RulesError> {
        let Phase::Confirm { piece, legal } = &self.phase else {
            debug!(phase = self.phase.name(), %dest, "confirmation ignored");
            return Ok(());
        };
        let piece = *piece;

        if !legal.contains(&dest) {
            if self
                .board
                .piece_at(dest)
                .is_some_and(|p| p.id != piece && p.belongs_to(self.to_move))
            {
                return self.select_square(dest);
            }
            debug!(%dest, "destination is not legal");
            self.presenter
                .display_legal_moves(self.board.piece(piece)?, legal);
            return Ok(());
        }

        self.advance(piece, dest)
    }

    /// Drop the current selection.
    pub fn cancel(&mut self) {
        if let Phase::Confirm { .. } = self.phase {
            self.phase = Phase::Select;
            self.prompt();
        }
    }

    /// Resolve a pending promotion and finish the turn.
    ///
    /// An invalid kind is an error and leaves the promotion pending.
    pub fn choose_promotion(&mut self, kind: PieceKind) -> Result<(), RulesError> {
        let Phase::AwaitingPromotion { pawn } = self.phase else {
            return Err(self.wrong_phase("choose_promotion"));
        };
        self.board.promote(pawn, kind)?;
        self.finish_turn()
    }

    fn advance(&mut self, piece: PieceId, dest: Coord) -> Result<(), RulesError> {
        // Evaluating the outcome needs both kings; fail before the move is applied.
        for color in Color::ALL {
            self.board.king(color)?;
        }
        let played = self.board.play(piece, dest)?;
        self.board.players_mut()[self.to_move].moves_played += 1;
        debug!(mv = ?played.mv, "move applied");

        if let Some(pawn) = played.promotion_pending {
            self.phase = Phase::AwaitingPromotion { pawn };
            let choice = self.presenter.ask_for_promotion(self.board.piece(pawn)?);
            return match choice {
                Some(kind) => self.choose_promotion(kind),
                None => Ok(()),
            };
        }
        self.finish_turn()
    }

    fn finish_turn(&mut self) -> Result<(), RulesError> {
        self.presenter.draw(&self.board);

        let mover = self.to_move;
        let opponent = mover.other();
        if self.board.is_checkmate(opponent)? {
            info!(winner = %mover, "checkmate");
            self.phase = Phase::GameOver(Outcome::Winner(mover));
            self.presenter.declare_winner(&self.board.players()[mover]);
            self.presenter.draw(&self.board);
        } else if self.board.is_stalemate(opponent)? {
            info!("stalemate");
            self.phase = Phase::GameOver(Outcome::Draw);
            self.presenter.declare_draw();
            self.presenter.draw(&self.board);
        } else {
            if self.board.in_check(opponent)? {
                self.presenter.tell_check(&self.board.players()[opponent]);
            }
            self.to_move = opponent;
            self.phase = Phase::Select;
            self.prompt();
        }
        Ok(())
    }

    fn prompt(&mut self) {
        self.presenter.ask_for_move(&self.board.players()[self.to_move]);
    }

    fn wrong_phase(&self, operation: &'static str) -> RulesError {
        RulesError::WrongPhase {
            operation,
            phase: self.phase.name(),
        }
    }

    #[inline]
    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[inline]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn current_player(&self) -> &Player {
        &self.board.players()[self.to_move]
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.board.players()[color]
    }

    pub fn score(&self, color: Color) -> u32 {
        self.player(color).score
    }

    pub fn pieces_to_render(&self) -> impl Iterator<Item = &ChessPiece> {
        self.board.pieces_to_render()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.board.last_move()
    }

    pub fn history(&self) -> &[Move] {
        self.board.history()
    }

    /// The piece most recently selected, even after its move completed.
    pub fn last_selected_piece(&self) -> Option<&ChessPiece> {
        self.last_selected.and_then(|id| self.board.get(id))
    }

    #[inline]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[inline]
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
