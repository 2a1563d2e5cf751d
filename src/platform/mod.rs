//! Browser platform layer
//!
//! Handles the pieces only a browser provides:
//! - Webcam acquisition and the pose model (through inline JS)
//! - A `TurnIntentSource` backed by them

pub mod webcam;

pub use webcam::WebcamIntentSource;
