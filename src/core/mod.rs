//! Chess-agnostic primitives.
//!
//! - [`coord`]: grid coordinates, board bounds and lazy rays.
//! - [`player`]: the two sides and their counters.
//! - [`piece`]: arena handles and the piece lifecycle.
//! - [`board`]: the generic occupancy model shared by any rectangular game.

pub mod board;
pub mod coord;
pub mod piece;
pub mod player;
