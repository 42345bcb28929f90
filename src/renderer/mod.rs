//! Rendering module
//!
//! `scene` turns a read-only snapshot into draw commands; `canvas` replays
//! them on a Canvas 2D context in the browser.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::{DrawCmd, build_scene, colors};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
