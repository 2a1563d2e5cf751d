//! Kinematic player model
//!
//! The player stays put on screen; heading and speed decide how far the
//! world slides past each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input::TurnIntent;
use crate::tuning::Tuning;
use crate::wrap_heading;

/// The rider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Position on the course plane (y grows downhill)
    pub pos: Vec2,
    /// Radians in (-π, π], 0 = straight downhill
    pub heading: f32,
    /// Always within [0, max_speed]
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Player {
    pub fn new(canvas_width: f32, start_y: f32) -> Self {
        Self {
            pos: Vec2::new(canvas_width / 2.0, start_y),
            heading: 0.0,
            speed: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }

    /// Apply one tick of steering and throttle
    ///
    /// The intent only turns; throttle always follows the resulting heading,
    /// so riding straight with no input still accelerates.
    pub fn update(&mut self, intent: TurnIntent, tuning: &Tuning) {
        match intent {
            TurnIntent::Left => self.heading -= tuning.turn_speed,
            TurnIntent::Right => self.heading += tuning.turn_speed,
            TurnIntent::None => {}
        }
        self.heading = wrap_heading(self.heading);

        let angle_factor = self.heading.cos();
        if angle_factor > 0.0 {
            self.speed += tuning.acceleration * angle_factor;
        } else {
            self.speed -= tuning.deceleration * angle_factor.abs();
        }

        self.speed = self.speed.clamp(0.0, tuning.max_speed);
    }

    /// Displacement for this tick: x lateral, y downhill
    #[inline]
    pub fn movement(&self) -> Vec2 {
        Vec2::new(
            self.speed * self.heading.sin(),
            self.speed * self.heading.cos(),
        )
    }

    /// Radius of the single circle standing in for the board
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }

    /// Draw rotation so the board points along its travel direction
    pub fn facing(&self) -> f32 {
        let movement = self.movement();
        if movement == Vec2::ZERO {
            // At rest atan2 is meaningless; use the limit value
            return -self.heading;
        }
        movement.y.atan2(movement.x) - std::f32::consts::FRAC_PI_2
    }

    /// Keep the board fully on a narrower canvas
    pub fn handle_resize(&mut self, canvas_width: f32) {
        let half = self.width / 2.0;
        self.pos.x = self.pos.x.min(canvas_width - half).max(half);
    }
}
