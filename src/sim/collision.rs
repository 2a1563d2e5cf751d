//! Collision detection
//!
//! The board is approximated by one circle of radius max(w, h) / 2; every
//! obstacle is a circle of its own diameter. Touching circles do not collide.

use glam::Vec2;

use super::obstacle::Obstacle;
use super::player::Player;

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// First obstacle the player overlaps, in field order
pub fn first_collision<'a>(player: &Player, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    let radius = player.collision_radius();
    obstacles
        .iter()
        .find(|o| circles_overlap(player.pos, radius, o.pos, o.radius()))
}

/// Whether the player overlaps any obstacle
pub fn check_collision(player: &Player, obstacles: &[Obstacle]) -> bool {
    first_collision(player, obstacles).is_some()
}
