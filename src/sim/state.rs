//! Game state and lifecycle
//!
//! Single writer: the tick and the explicit mutation methods below. Every
//! mutation bumps `revision` so the renderer knows when to redraw.

use std::collections::VecDeque;
use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Position};
use super::queue::Track;
use crate::consts::*;
use crate::error::GameError;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameLifecycle {
    /// No active snake or food
    Idle,
    /// Simulation ticking
    Playing,
    /// Simulation frozen, summary available
    GameOver,
}

impl GameLifecycle {
    /// Idle -> Playing -> GameOver -> Idle, nothing else
    pub fn can_transition_to(self, to: GameLifecycle) -> bool {
        matches!(
            (self, to),
            (GameLifecycle::Idle, GameLifecycle::Playing)
                | (GameLifecycle::Playing, GameLifecycle::GameOver)
                | (GameLifecycle::GameOver, GameLifecycle::Idle)
        )
    }
}

/// The single edible target
#[derive(Debug, Clone)]
pub struct Food {
    pub pos: Position,
    pub track: Rc<Track>,
    /// Artwork to draw; also the asset-cache key
    pub artwork_url: Option<String>,
}

/// Something the outside world should react to
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Food placed; its artwork should be preloaded
    FoodSpawned {
        pos: Position,
        artwork_url: Option<String>,
    },
    /// A track was eaten and appended to history
    TrackEaten { order: u32, track: Rc<Track> },
    /// Playback should switch to this track
    TrackChanged { track: Rc<Track> },
    /// Self-collision ended the run
    GameOver { score: u32 },
}

/// Everything the board shows
#[derive(Debug, Clone)]
pub struct GameState {
    pub lifecycle: GameLifecycle,
    pub paused: bool,
    pub score: u32,
    /// Head first
    pub body: VecDeque<Position>,
    /// Pending heading, applied on the next tick
    pub direction: Direction,
    /// Heading of the last executed move
    pub heading: Direction,
    pub food: Option<Food>,
    /// CSS colour behind the board
    pub bg_color: String,
    /// Bumped on every mutation
    pub revision: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            lifecycle: GameLifecycle::Idle,
            paused: false,
            score: 0,
            body: VecDeque::from([start_position()]),
            direction: Direction::Right,
            heading: Direction::Right,
            food: None,
            bg_color: DEFAULT_BG_COLOR.to_string(),
            revision: 0,
        }
    }

    pub fn head(&self) -> Position {
        self.body.front().copied().unwrap_or_else(start_position)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Record that something observable changed
    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Move to another phase, refusing anything off the lifecycle graph
    pub fn transition(&mut self, to: GameLifecycle) -> Result<(), GameError> {
        let from = self.lifecycle;
        if !from.can_transition_to(to) {
            return Err(GameError::InvalidTransition { from, to });
        }
        log::info!("Lifecycle {:?} -> {:?}", from, to);
        self.lifecycle = to;
        self.touch();
        Ok(())
    }

    /// Raw direction write; turn rules live in the input controller
    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.touch();
        }
    }

    pub fn set_food(&mut self, food: Option<Food>) {
        self.food = food;
        self.touch();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            self.touch();
        }
    }

    pub fn set_bg_color(&mut self, color: impl Into<String>) {
        self.bg_color = color.into();
        self.touch();
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
        self.touch();
    }

    /// True while the simulation should be advancing
    pub fn is_running(&self) -> bool {
        self.lifecycle == GameLifecycle::Playing && !self.paused
    }

    /// Back to a fresh idle board. Refused mid-game.
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        if self.lifecycle == GameLifecycle::GameOver {
            self.transition(GameLifecycle::Idle)?;
        } else if self.lifecycle != GameLifecycle::Idle {
            return Err(GameError::InvalidTransition {
                from: self.lifecycle,
                to: GameLifecycle::Idle,
            });
        }

        let revision = self.revision;
        *self = Self::new();
        self.revision = revision;
        self.touch();
        Ok(())
    }
}

fn start_position() -> Position {
    IVec2::new(START_X, START_Y)
}
