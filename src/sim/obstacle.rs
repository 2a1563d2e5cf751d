//! Obstacle field
//!
//! Obstacles live in canvas coordinates and slide opposite to the player's
//! movement. New ones appear just below the visible area and are culled once
//! they drift far enough outside it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{CULL_HORIZONTAL_BUFFER, CULL_VERTICAL_BUFFER};
use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Tree,
}

impl ObstacleKind {
    /// Half-open range sizes are drawn from
    pub fn size_range(&self) -> std::ops::Range<f32> {
        match self {
            ObstacleKind::Rock => 20.0..40.0,
            ObstacleKind::Tree => 30.0..60.0,
        }
    }
}

/// A rock or tree on the slope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Diameter used for collision and drawing
    pub size: f32,
    pub pos: Vec2,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, size: f32, pos: Vec2) -> Self {
        Self { kind, size, pos }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Past the top edge, or too far to either side
    pub fn is_off_field(&self, canvas_width: f32) -> bool {
        self.pos.y < -CULL_VERTICAL_BUFFER
            || self.pos.x < -CULL_HORIZONTAL_BUFFER
            || self.pos.x > canvas_width + CULL_HORIZONTAL_BUFFER
    }
}

/// All live obstacles plus the bounds and RNG used to spawn them
#[derive(Debug, Clone)]
pub struct ObstacleField {
    /// Draw order only; no gameplay meaning
    pub obstacles: Vec<Obstacle>,
    width: f32,
    height: f32,
    rng: Pcg32,
}

impl ObstacleField {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            width,
            height,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Spawn probability per tick, growing with distance up to the cap
    pub fn spawn_rate(distance: f32, tuning: &Tuning) -> f32 {
        (tuning.base_spawn_rate + distance * tuning.spawn_growth)
            .clamp(0.0, tuning.max_spawn_rate)
    }

    /// Roll once; on success add exactly one obstacle below the screen
    pub fn spawn(&mut self, distance: f32, tuning: &Tuning) -> Option<&Obstacle> {
        let rate = Self::spawn_rate(distance, tuning);
        if self.rng.random::<f32>() >= rate {
            return None;
        }

        let kind = if self.rng.random_bool(0.5) {
            ObstacleKind::Rock
        } else {
            ObstacleKind::Tree
        };
        let size = self.rng.random_range(kind.size_range());
        let x = if self.width > 0.0 {
            self.rng.random_range(0.0..self.width)
        } else {
            0.0
        };
        let obstacle = Obstacle::new(kind, size, Vec2::new(x, self.height + size));
        log::debug!(
            "Spawned {:?} size {:.1} at x {:.1} (rate {:.4})",
            kind,
            size,
            x,
            rate
        );

        self.obstacles.push(obstacle);
        self.obstacles.last()
    }

    /// Place an obstacle directly
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Slide every obstacle opposite to the player's movement, then cull
    pub fn advance(&mut self, movement: Vec2) {
        for obstacle in &mut self.obstacles {
            obstacle.pos -= movement;
        }
        let width = self.width;
        self.obstacles.retain(|o| !o.is_off_field(width));
    }

    /// New bounds apply to future spawns and culling; live obstacles stay put
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
