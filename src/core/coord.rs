use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

/// A grid cell. Files (`x`) and ranks (`y`) are 1-based on the board; offsets reuse the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Self::Output {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Self::Output {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    #[inline]
    fn mul(self, rhs: i32) -> Coord {
        Coord {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Algebraic name (`a1`..`z9`). Only meaningful for boards up to 26 files and 9 ranks.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.x.checked_sub(1).map(u8::try_from) {
            Some(Ok(file)) if file < 26 => write!(f, "{}{}", (b'a' + file) as char, self.y),
            _ => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

impl FromStr for Coord {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidSquare {
            text: s.to_string(),
        };
        let mut chars = s.chars();
        let file = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return Err(invalid());
        }
        let rank: i32 = chars.as_str().parse().map_err(|_| invalid())?;
        if rank < 1 {
            return Err(invalid());
        }
        Ok(Coord::new(i32::from(file as u8 - b'a') + 1, rank))
    }
}

/// Rectangular extent of a board: `1..=width` by `1..=height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(self, c: Coord) -> bool {
        (1..=self.width).contains(&c.x) && (1..=self.height).contains(&c.y)
    }

    /// Squares reached by repeatedly stepping `dir` from `from` (exclusive), stopping at the edge.
    #[inline]
    pub fn ray(self, from: Coord, dir: Coord) -> Ray {
        Ray {
            next: from + dir,
            dir,
            bounds: self,
        }
    }
}

/// Lazy, finite sequence of fresh coordinates along one direction.
///
/// Nothing is mutated in place; rescanning means asking [`Bounds::ray`] for a new one.
#[derive(Debug, Clone)]
pub struct Ray {
    next: Coord,
    dir: Coord,
    bounds: Bounds,
}

impl Iterator for Ray {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.dir == Coord::new(0, 0) || !self.bounds.contains(self.next) {
            return None;
        }
        let out = self.next;
        self.next = out + self.dir;
        Some(out)
    }
}

/// The 8 king steps around the origin.
pub const KING_STEPS: [Coord; 8] = [
    Coord { x: -1, y: -1 },
    Coord { x: -1, y: 0 },
    Coord { x: -1, y: 1 },
    Coord { x: 0, y: -1 },
    Coord { x: 0, y: 1 },
    Coord { x: 1, y: -1 },
    Coord { x: 1, y: 0 },
    Coord { x: 1, y: 1 },
];
