//! Game state and core simulation types
//!
//! One `GameState` is one independent game; nothing here is global, so any
//! number can run side by side.

use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleField};
use super::player::Player;
use super::snapshot::{FrameSnapshot, ObstacleSnapshot};
use crate::consts::PLAYER_START_Y;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the pre-game sequence to finish
    #[default]
    Idle,
    /// Ticks advance the run
    Running,
    /// A collision ended the run; ticks are ignored until restart
    GameOver,
}

/// Notifications for the presentation layer, drained after each tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u64),
    GameOver { score: u64, distance: f32 },
    RenderFrame(FrameSnapshot),
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Base seed; each run derives its own course from it
    seed: u64,
    /// Runs started since creation (0-based), mixed into the course seed
    run: u32,
    pub(super) tuning: Tuning,
    pub(super) phase: GamePhase,
    pub(super) player: Player,
    pub(super) field: ObstacleField,
    /// Downhill distance covered this run; never decreases
    pub(super) distance: f32,
    /// floor(distance / DISTANCE_PER_POINT)
    pub(super) score: u64,
    /// Ticks run this run
    pub(super) time_ticks: u64,
    pub(super) events: Vec<GameEvent>,
    width: f32,
    height: f32,
}

/// Course seed for a given run
fn run_seed(seed: u64, run: u32) -> u64 {
    (run as u64).wrapping_mul(2654435761).wrapping_add(seed)
}

impl GameState {
    /// Create an idle game on a `width` x `height` canvas
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default())
    }

    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        Self {
            seed,
            run: 0,
            tuning,
            phase: GamePhase::Idle,
            player: Player::new(width, PLAYER_START_Y),
            field: ObstacleField::new(width, height, run_seed(seed, 0)),
            distance: 0.0,
            score: 0,
            time_ticks: 0,
            events: Vec::new(),
            width,
            height,
        }
    }

    /// Fresh player, empty field, zeroed distance and score
    fn reset_run(&mut self) {
        self.player = Player::new(self.width, PLAYER_START_Y);
        self.field = ObstacleField::new(self.width, self.height, run_seed(self.seed, self.run));
        self.distance = 0.0;
        self.score = 0;
        self.time_ticks = 0;
    }

    /// Idle -> Running. Returns false (and does nothing) from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            log::warn!("Ignoring start while {:?}", self.phase);
            return false;
        }
        self.reset_run();
        self.phase = GamePhase::Running;
        log::info!("Run {} started (seed {})", self.run, run_seed(self.seed, self.run));
        true
    }

    /// Back to Idle with a fresh run; `start` re-enters Running
    pub fn restart(&mut self) {
        let had_score = self.score != 0;
        self.run += 1;
        self.reset_run();
        self.phase = GamePhase::Idle;
        self.events.clear();
        if had_score {
            self.events.push(GameEvent::ScoreChanged(0));
        }
        log::info!("Game reset for run {}", self.run);
    }

    /// Canvas changed size; the current run carries on
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.player.handle_resize(width);
        self.field.handle_resize(width, height);
        log::debug!("Resized to {}x{}", width, height);
    }

    /// Place an obstacle on the current course
    pub fn place_obstacle(&mut self, obstacle: Obstacle) {
        self.field.push(obstacle);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            player: (&self.player).into(),
            obstacles: self.field.obstacles.iter().map(ObstacleSnapshot::from).collect(),
            score: self.score,
            distance: self.distance,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.field.obstacles
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;
    use glam::Vec2;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1, 800.0, 600.0);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.player().pos, Vec2::new(400.0, 50.0));
        assert!(state.obstacles().is_empty());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut state = GameState::new(1, 800.0, 600.0);
        assert!(state.start());
        assert_eq!(state.phase(), GamePhase::Running);
        assert!(!state.start());
        assert_eq!(state.phase(), GamePhase::Running);
    }

    #[test]
    fn test_resize_propagates_without_reset() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.start();
        state.place_obstacle(Obstacle::new(ObstacleKind::Rock, 30.0, Vec2::new(700.0, 400.0)));
        state.resize(300.0, 200.0);
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.player().pos.x, 290.0);
        assert_eq!(state.field().bounds(), (300.0, 200.0));
        assert_eq!(state.obstacles().len(), 1);
        assert_eq!(state.canvas_size(), (300.0, 200.0));
    }

    #[test]
    fn test_restart_uses_new_course_seed() {
        assert_ne!(run_seed(5, 0), run_seed(5, 1));
        let mut state = GameState::new(5, 800.0, 600.0);
        state.restart();
        assert_eq!(state.run(), 1);
        assert_eq!(state.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_independent_states() {
        let mut a = GameState::new(1, 800.0, 600.0);
        let b = GameState::new(1, 800.0, 600.0);
        a.start();
        a.place_obstacle(Obstacle::new(ObstacleKind::Tree, 40.0, Vec2::new(1.0, 1.0)));
        assert_eq!(a.obstacles().len(), 1);
        assert!(b.obstacles().is_empty());
        assert_eq!(b.phase(), GamePhase::Idle);
    }
}
