use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The enemy relation: symmetric and fixed.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank step a pawn of this color advances by.
    #[inline]
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub color: Color,
    pub score: u32,
    pub moves_played: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            score: 0,
            moves_played: 0,
        }
    }

    #[inline]
    pub fn enemy(&self) -> Color {
        self.color.other()
    }
}

/// Exactly two players, addressed by color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Players([Player; 2]);

impl Players {
    pub fn new(white_name: impl Into<String>, black_name: impl Into<String>) -> Self {
        Self([
            Player::new(white_name, Color::White),
            Player::new(black_name, Color::Black),
        ])
    }

    /// Zero scores and move counters, keeping names.
    pub fn reset_counters(&mut self) {
        for p in self.0.iter_mut() {
            p.score = 0;
            p.moves_played = 0;
        }
    }
}

impl Index<Color> for Players {
    type Output = Player;

    #[inline]
    fn index(&self, color: Color) -> &Player {
        &self.0[color.index()]
    }
}

impl IndexMut<Color> for Players {
    #[inline]
    fn index_mut(&mut self, color: Color) -> &mut Player {
        &mut self.0[color.index()]
    }
}
