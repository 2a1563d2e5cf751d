//! Pose keypoint heuristics
//!
//! A raised arm steers: the wrist above (or just below) its shoulder turns
//! toward that side. The simulation never sees any of this, only the
//! resulting `TurnIntent`.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::input::TurnIntent;

pub const LEFT_SHOULDER: &str = "left_shoulder";
pub const RIGHT_SHOULDER: &str = "right_shoulder";
pub const LEFT_WRIST: &str = "left_wrist";
pub const RIGHT_WRIST: &str = "right_wrist";

/// One named body landmark in video pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    /// Model confidence (0-1)
    #[serde(default)]
    pub score: f32,
}

/// A single-person pose estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Parse the model's JSON output; `null` means no person detected
    pub fn from_json(json: &str) -> Result<Option<Self>, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints
            .iter()
            .find(|k| k.name.as_deref() == Some(name))
    }

    fn confident(&self, name: &str, threshold: f32) -> Option<&Keypoint> {
        self.keypoint(name).filter(|k| k.score > threshold)
    }
}

/// Confidence thresholds and arm geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseThresholds {
    /// Shoulder confidence needed to steer
    pub shoulder: f32,
    /// Wrist confidence needed to steer
    pub wrist: f32,
    /// Wrist counts as raised while above shoulder.y + offset (pixels, y down)
    pub raise_offset: f32,
    /// Shoulder confidence needed before the countdown may start
    pub ready_shoulder: f32,
    /// Wrist confidence needed before the countdown may start
    pub ready_wrist: f32,
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            shoulder: 0.3,
            wrist: 0.2,
            raise_offset: 10.0,
            ready_shoulder: 0.05,
            ready_wrist: 0.01,
        }
    }
}

fn arm_raised(pose: &Pose, shoulder: &str, wrist: &str, t: &PoseThresholds) -> bool {
    match (pose.confident(shoulder, t.shoulder), pose.confident(wrist, t.wrist)) {
        (Some(s), Some(w)) => w.y < s.y + t.raise_offset,
        _ => false,
    }
}

/// Derive a turn from a pose; the left arm wins when both are raised
pub fn turn_from_pose(pose: &Pose, thresholds: &PoseThresholds) -> TurnIntent {
    if arm_raised(pose, LEFT_SHOULDER, LEFT_WRIST, thresholds) {
        TurnIntent::Left
    } else if arm_raised(pose, RIGHT_SHOULDER, RIGHT_WRIST, thresholds) {
        TurnIntent::Right
    } else {
        TurnIntent::None
    }
}

/// Whether shoulders and wrists are all visible enough to begin
pub fn pose_ready(pose: &Pose, thresholds: &PoseThresholds) -> bool {
    let shoulders = [LEFT_SHOULDER, RIGHT_SHOULDER]
        .iter()
        .all(|n| pose.confident(n, thresholds.ready_shoulder).is_some());
    let wrists = [LEFT_WRIST, RIGHT_WRIST]
        .iter()
        .all(|n| pose.confident(n, thresholds.ready_wrist).is_some());
    shoulders && wrists
}

/// Turn intent straight from model JSON; any failure means no turn
pub fn turn_from_json(json: &str, thresholds: &PoseThresholds) -> TurnIntent {
    match Pose::from_json(json) {
        Ok(Some(pose)) => turn_from_pose(&pose, thresholds),
        Ok(None) => TurnIntent::None,
        Err(e) => {
            log::debug!("Ignoring unusable pose: {}", e);
            TurnIntent::None
        }
    }
}

/// Readiness straight from model JSON; any failure means not ready
pub fn ready_from_json(json: &str, thresholds: &PoseThresholds) -> bool {
    match Pose::from_json(json) {
        Ok(Some(pose)) => pose_ready(&pose, thresholds),
        Ok(None) => false,
        Err(e) => {
            log::debug!("Ignoring unusable pose during readiness check: {}", e);
            false
        }
    }
}
