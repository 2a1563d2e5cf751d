//! Canvas 2D rendering module
//!
//! Draws a `FrameSnapshot`; never reads simulation state directly.

pub mod canvas;

pub use canvas::CanvasRenderer;
