//! A two-player chess rules engine: board model, legal-move generation, check / checkmate /
//! stalemate detection and turn management, for any front-end to drive.
//!
//! - [`core`]: chess-agnostic coordinates, players and the piece arena.
//! - [`chess`]: piece kinds, move generation, the 8x8 board and its special rules.
//! - [`game`]: the turn state machine and the [`game::Presenter`] collaborator.

pub mod chess;
pub mod config;
pub mod core;
pub mod error;
pub mod game;

pub use crate::chess::board::ChessBoard;
pub use crate::chess::moves::{Move, Played, Special};
pub use crate::chess::piece::{ChessPiece, PieceKind};
pub use crate::config::GameConfig;
pub use crate::core::coord::Coord;
pub use crate::core::piece::{PieceId, PieceState};
pub use crate::core::player::{Color, Player, Players};
pub use crate::error::{ConfigError, RulesError};
pub use crate::game::{Game, Headless, Outcome, Phase, Presenter};
