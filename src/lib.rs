//! Slope Rider - A webcam-steered downhill dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player kinematics, obstacle field, collisions)
//! - `input`: Turn intent abstraction consumed once per tick
//! - `pose`: Keypoint heuristics that turn a pose estimate into a turn intent
//! - `pregame`: Readiness poll and countdown before a run starts
//! - `session`: Async driver tying an input source to the simulation
//! - `renderer`, `ui`, `platform`: Browser glue (wasm32 only)

pub mod error;
pub mod input;
pub mod pose;
pub mod pregame;
pub mod session;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use error::GameError;
pub use input::{ScriptedIntents, TurnIntent, TurnIntentSource};
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Player board dimensions (collision radius is max(w, h) / 2)
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Fixed y of the player on the course plane
    pub const PLAYER_START_Y: f32 = 50.0;

    /// Radians per tick while a turn is held
    pub const TURN_SPEED: f32 = 0.05;
    /// Speed gained per tick when heading downhill (scaled by cos(heading))
    pub const ACCELERATION: f32 = 0.05;
    /// Speed lost per tick when heading across/uphill; brakes faster than it accelerates
    pub const DECELERATION: f32 = 0.1;
    pub const MAX_SPEED: f32 = 10.0;

    /// Spawn probability per tick at distance 0
    pub const BASE_SPAWN_RATE: f32 = 0.02;
    pub const MAX_SPAWN_RATE: f32 = 0.1;
    /// Spawn probability added per unit of distance
    pub const SPAWN_GROWTH: f32 = 0.00001;

    /// Obstacles may drift this far outside the canvas before being culled
    pub const CULL_VERTICAL_BUFFER: f32 = 50.0;
    pub const CULL_HORIZONTAL_BUFFER: f32 = 200.0;

    /// Distance units per score point
    pub const DISTANCE_PER_POINT: f32 = 10.0;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_heading(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Initialize native logging (honors `RUST_LOG`, defaults to info)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    // Fails only if a logger is already installed (e.g. a second call from tests)
    let _ = env_logger::Builder::from_env(env).try_init();
}
