//! Input controller
//!
//! Turns raw keys and swipe gestures into steering commands and applies them
//! to the game state under the no-reverse rule.

use crate::sim::{Direction, GameState};

/// What a raw input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    TogglePause,
    /// Show or hide the grid lines (persisted)
    ToggleGrid,
}

/// Map a `KeyboardEvent.key` value to a command
pub fn map_key(key: &str) -> Option<Command> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Command::Steer(Direction::Up)),
        "ArrowDown" | "s" | "S" => Some(Command::Steer(Direction::Down)),
        "ArrowLeft" | "a" | "A" => Some(Command::Steer(Direction::Left)),
        "ArrowRight" | "d" | "D" => Some(Command::Steer(Direction::Right)),
        " " | "Escape" | "p" | "P" => Some(Command::TogglePause),
        "g" | "G" => Some(Command::ToggleGrid),
        _ => None,
    }
}

/// Applies steering to the state.
///
/// A request must be perpendicular to the heading of the last executed move.
/// Between ticks the pending direction can be replaced freely under that rule;
/// the last accepted one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputController;

impl InputController {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if the direction was accepted
    pub fn steer(&self, state: &mut GameState, requested: Direction) -> bool {
        if !requested.turns_from(state.heading) {
            log::debug!("Rejected turn {:?} while heading {:?}", requested, state.heading);
            return false;
        }
        state.set_direction(requested);
        true
    }
}

/// Tracks one touch from start to end and classifies it as a swipe
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(f64, f64)>,
    threshold: f64,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Finish the gesture. Dominant axis wins; short drags are ignored.
    pub fn end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (sx, sy) = self.start.take()?;
        let (dx, dy) = (x - sx, y - sy);

        if dx.abs().max(dy.abs()) < self.threshold {
            return None;
        }

        Some(if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}
