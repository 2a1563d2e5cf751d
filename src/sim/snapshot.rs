//! Read-only frame data handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind};
use super::player::Player;
use crate::error::GameError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub heading: f32,
    /// Canvas rotation for drawing the board along its travel direction
    pub facing: f32,
    pub speed: f32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            x: player.pos.x,
            y: player.pos.y,
            width: player.width,
            height: player.height,
            heading: player.heading,
            facing: player.facing(),
            speed: player.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl From<&Obstacle> for ObstacleSnapshot {
    fn from(obstacle: &Obstacle) -> Self {
        Self {
            kind: obstacle.kind,
            x: obstacle.pos.x,
            y: obstacle.pos.y,
            size: obstacle.size,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub player: PlayerSnapshot,
    /// In draw order
    pub obstacles: Vec<ObstacleSnapshot>,
    pub score: u64,
    pub distance: f32,
}

impl FrameSnapshot {
    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_snapshot_copies_geometry() {
        let mut player = Player::new(800.0, 50.0);
        player.speed = 4.0;
        player.heading = 0.2;
        let tree = Obstacle::new(ObstacleKind::Tree, 45.0, Vec2::new(10.0, 20.0));

        let p = PlayerSnapshot::from(&player);
        assert_eq!((p.x, p.y), (400.0, 50.0));
        assert_eq!(p.speed, 4.0);
        assert!((p.facing + 0.2).abs() < 1e-5);

        let o = ObstacleSnapshot::from(&tree);
        assert_eq!(o.kind, ObstacleKind::Tree);
        assert_eq!((o.x, o.y, o.size), (10.0, 20.0, 45.0));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let player = Player::new(800.0, 50.0);
        let rock = Obstacle::new(ObstacleKind::Rock, 25.0, Vec2::new(1.0, 2.0));
        let frame = FrameSnapshot {
            player: (&player).into(),
            obstacles: vec![(&rock).into()],
            score: 3,
            distance: 34.5,
        };
        let json = frame.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 3);
        assert_eq!(value["obstacles"][0]["kind"], "Rock");
        assert_eq!(value["player"]["x"], 400.0);
    }
}
