//! Chess semantics on top of the generic board: piece kinds, move generation, check detection
//! and move execution.

pub mod board;
pub mod movegen;
pub mod moves;
pub mod piece;
