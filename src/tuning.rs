//! Gameplay tunables
//!
//! The game has no user-facing settings; this bundles the fixed constants
//! so a `GameState` carries the values it was built with.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Fixed tunable constants for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Player kinematics ===
    pub turn_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_speed: f32,

    // === Obstacle spawning ===
    pub base_spawn_rate: f32,
    pub max_spawn_rate: f32,
    pub spawn_growth: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            turn_speed: TURN_SPEED,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            max_speed: MAX_SPEED,

            base_spawn_rate: BASE_SPAWN_RATE,
            max_spawn_rate: MAX_SPAWN_RATE,
            spawn_growth: SPAWN_GROWTH,
        }
    }
}

impl Tuning {
    /// Default tuning with obstacle spawning switched off
    pub fn without_spawns() -> Self {
        Self {
            base_spawn_rate: 0.0,
            max_spawn_rate: 0.0,
            spawn_growth: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braking_outpaces_acceleration() {
        let tuning = Tuning::default();
        assert!(tuning.acceleration < tuning.deceleration);
        assert_eq!(tuning.deceleration / tuning.acceleration, 2.0);
    }

    #[test]
    fn test_without_spawns_keeps_kinematics() {
        let tuning = Tuning::without_spawns();
        assert_eq!(tuning.max_spawn_rate, 0.0);
        assert_eq!(tuning.turn_speed, TURN_SPEED);
        assert_eq!(tuning.max_speed, MAX_SPEED);
    }
}
