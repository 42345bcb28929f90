//! Snakeify - snake on a grid, wired to a music queue
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, track queue, tick, game state)
//! - `session`: Owns one game session and forwards sim events to collaborators
//! - `renderer`: Scene building and Canvas 2D drawing
//! - `input`: Keyboard/swipe mapping with the no-reverse rule
//! - `platform`: Browser glue (credentials, HTTP, timers)

pub mod assets;
pub mod catalog;
pub mod error;
pub mod input;
pub mod palette;
pub mod platform;
pub mod playback;
pub mod renderer;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Cells per side of the square board
    pub const GRID_SIZE: i32 = 20;
    /// Pixel size of one cell on the canvas
    pub const CELL_SIZE: f32 = 20.0;

    /// Default simulation interval
    pub const TICK_INTERVAL_MS: u32 = 150;

    /// Random draws before food placement falls back to a linear scan
    pub const SPAWN_RANDOM_ATTEMPTS: u32 = 64;

    /// Upper bound on tracks pulled from the catalogue per session
    pub const TRACK_BATCH_LIMIT: usize = 50;

    /// Where a fresh snake's head sits
    pub const START_X: i32 = 10;
    pub const START_Y: i32 = 10;

    /// Background before any artwork colour is known
    pub const DEFAULT_BG_COLOR: &str = "#FF90E8";
}
