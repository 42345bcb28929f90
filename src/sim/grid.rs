//! Grid positions, headings and wrap-around

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A cell on the board. Always within `0..GRID_SIZE` on both axes after a move.
pub type Position = IVec2;

/// Snake heading in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// No heading yet
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step for this heading
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::None => IVec2::ZERO,
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True when `self` is a legal turn away from `heading`.
    ///
    /// Only the axis that is currently zero may change; a neutral heading
    /// accepts anything.
    pub fn turns_from(self, heading: Direction) -> bool {
        match self {
            Direction::None => false,
            Direction::Up | Direction::Down => !heading.is_vertical(),
            Direction::Left | Direction::Right => !heading.is_horizontal(),
        }
    }
}

/// Wrap one step past an edge back onto the opposite edge
#[inline]
pub fn wrap_position(pos: Position) -> Position {
    let wrap = |c: i32| {
        if c < 0 {
            GRID_SIZE - 1
        } else if c >= GRID_SIZE {
            0
        } else {
            c
        }
    };
    IVec2::new(wrap(pos.x), wrap(pos.y))
}

/// Check both coordinates are on the board
#[inline]
pub fn in_bounds(pos: Position) -> bool {
    (0..GRID_SIZE).contains(&pos.x) && (0..GRID_SIZE).contains(&pos.y)
}
