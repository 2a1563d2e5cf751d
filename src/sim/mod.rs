//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame, one turn intent per tick
//! - Seeded RNG only
//! - No rendering, camera or platform dependencies

pub mod collision;
pub mod obstacle;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{check_collision, circles_overlap, first_collision};
pub use obstacle::{Obstacle, ObstacleField, ObstacleKind};
pub use player::Player;
pub use snapshot::{FrameSnapshot, ObstacleSnapshot, PlayerSnapshot};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
