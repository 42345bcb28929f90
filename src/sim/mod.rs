//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, no wall clock
//! - Caller-supplied RNG only
//! - No rendering, network or platform dependencies

pub mod grid;
pub mod queue;
pub mod spawn;
pub mod state;
pub mod tick;

pub use grid::{Direction, Position, wrap_position};
pub use queue::{Artwork, EatenRecord, Track, TrackQueue};
pub use spawn::find_free_cell;
pub use state::{Food, GameEvent, GameLifecycle, GameState};
pub use tick::tick;
