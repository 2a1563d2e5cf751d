//! Per-frame simulation tick
//!
//! Core game loop step: steer, slide the world, spawn, cull, collide, score.

use super::collision::first_collision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::DISTANCE_PER_POINT;
use crate::input::TurnIntent;

/// Advance a running game by one frame
///
/// Returns false without touching anything unless the game is `Running`.
/// A collision ends the run before score and render events are produced.
/// Callers drain `GameState::drain_events` after each tick; an undrained
/// render frame is replaced by the next one, so only score and game-over
/// events pile up.
pub fn tick(state: &mut GameState, intent: TurnIntent) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }

    state.time_ticks += 1;

    state.player.update(intent, &state.tuning);
    let movement = state.player.movement();
    // Riding back uphill moves the world but earns nothing
    state.distance += movement.y.max(0.0);

    state.field.spawn(state.distance, &state.tuning);
    state.field.advance(movement);

    if let Some(hit) = first_collision(&state.player, &state.field.obstacles) {
        log::info!(
            "Hit {:?} (size {:.1}) after {} ticks, distance {:.1}, score {}",
            hit.kind,
            hit.size,
            state.time_ticks,
            state.distance,
            state.score
        );
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            distance: state.distance,
        });
        return true;
    }

    let score = (state.distance / DISTANCE_PER_POINT).floor() as u64;
    if score != state.score {
        state.score = score;
        state.events.push(GameEvent::ScoreChanged(score));
    }

    let frame = state.snapshot();
    state
        .events
        .retain(|e| !matches!(e, GameEvent::RenderFrame(_)));
    state.events.push(GameEvent::RenderFrame(frame));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running_without_spawns() -> GameState {
        let mut state = GameState::with_tuning(12345, 800.0, 600.0, Tuning::without_spawns());
        assert!(state.start());
        state.drain_events();
        state
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = GameState::new(1, 800.0, 600.0);
        assert!(!tick(&mut state, TurnIntent::Right));
        assert_eq!(state.player().heading, 0.0);
        assert_eq!(state.time_ticks(), 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_ten_right_turns() {
        let mut state = running_without_spawns();
        let t = Tuning::default();
        assert_eq!(state.player().pos, Vec2::new(400.0, 50.0));

        let mut expected_speed = 0.0f64;
        let mut expected_distance = 0.0f64;
        let mut prev_speed = 0.0;
        for k in 1..=10 {
            assert!(tick(&mut state, TurnIntent::Right));
            let heading = k as f64 * t.turn_speed as f64;
            expected_speed += t.acceleration as f64 * heading.cos();
            expected_distance += expected_speed * heading.cos();

            let player = state.player();
            assert!(player.speed > prev_speed);
            prev_speed = player.speed;
            assert!((player.heading as f64 - heading).abs() < 1e-5);
            assert!((player.speed as f64 - expected_speed).abs() < 1e-5);
        }

        assert!((state.player().heading - 0.5).abs() < 1e-5);
        // Sum of 0.05 * cos(0.05k) for k = 1..=10
        assert!((state.player().speed as f64 - 0.4763).abs() < 1e-3);
        assert!((state.distance() as f64 - expected_distance).abs() < 1e-4);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_spawn_uses_distance_then_slides() {
        // Spawn probability is 0 up to distance 10 and saturates just past it
        let tuning = Tuning {
            base_spawn_rate: -100.0,
            spawn_growth: 10.0,
            max_spawn_rate: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(3, 800.0, 600.0, tuning);
        assert!(state.start());

        // Distance after 19 ticks is 9.5
        for _ in 0..19 {
            tick(&mut state, TurnIntent::None);
        }
        assert!(state.distance() < 10.0);
        assert!(state.obstacles().is_empty());

        // 10.5 after the 20th: spawned, then moved with the world in the same tick
        tick(&mut state, TurnIntent::None);
        assert!(state.distance() > 10.1);
        assert_eq!(state.obstacles().len(), 1);
        let move_y = state.player().movement().y;
        let o = &state.obstacles()[0];
        assert!((o.pos.y - (600.0 + o.size - move_y)).abs() < 1e-4);
    }

    #[test]
    fn test_undrained_frames_are_replaced() {
        let mut state = running_without_spawns();
        for _ in 0..50 {
            tick(&mut state, TurnIntent::Left);
        }
        let events = state.drain_events();
        let frames: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RenderFrame(_)))
            .collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(events.last(), Some(&GameEvent::RenderFrame(state.snapshot())));
    }

    #[test]
    fn test_coincident_rock_ends_run() {
        let mut state = running_without_spawns();
        let pos = state.player().pos;
        state.place_obstacle(Obstacle::new(ObstacleKind::Rock, 30.0, pos));

        assert!(tick(&mut state, TurnIntent::None));
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(state.is_terminal());

        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::GameOver { score: 0, .. }));

        // Further ticks do nothing
        let heading = state.player().heading;
        let distance = state.distance();
        for _ in 0..5 {
            assert!(!tick(&mut state, TurnIntent::Left));
        }
        assert_eq!(state.player().heading, heading);
        assert_eq!(state.distance(), distance);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_score_event_only_on_change() {
        let mut state = running_without_spawns();
        let mut score_events = Vec::new();
        let mut frames = 0;
        for _ in 0..100 {
            tick(&mut state, TurnIntent::None);
            for event in state.drain_events() {
                match event {
                    GameEvent::ScoreChanged(s) => score_events.push(s),
                    GameEvent::RenderFrame(frame) => {
                        frames += 1;
                        assert_eq!(frame.score, state.score());
                    }
                    GameEvent::GameOver { .. } => panic!("unexpected game over"),
                }
            }
        }
        assert_eq!(frames, 100);
        assert!(!score_events.is_empty());
        // Strictly increasing, no duplicates
        assert!(score_events.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*score_events.last().unwrap(), state.score());
        assert_eq!(state.score(), (state.distance() / 10.0).floor() as u64);
    }

    #[test]
    fn test_distance_never_decreases() {
        let mut state = running_without_spawns();
        // Build speed, then swing around to face uphill
        for _ in 0..60 {
            tick(&mut state, TurnIntent::None);
        }
        let mut prev = state.distance();
        for _ in 0..200 {
            tick(&mut state, TurnIntent::Right);
            assert!(state.distance() >= prev);
            prev = state.distance();
        }
    }

    #[test]
    fn test_obstacle_slides_toward_player() {
        let mut state = running_without_spawns();
        state.place_obstacle(Obstacle::new(ObstacleKind::Tree, 40.0, Vec2::new(400.0, 500.0)));
        for _ in 0..20 {
            tick(&mut state, TurnIntent::None);
        }
        let y = state.obstacles()[0].pos.y;
        assert!((500.0 - y - state.distance()).abs() < 1e-3);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running_without_spawns();
        for _ in 0..50 {
            tick(&mut state, TurnIntent::None);
        }
        let pos = state.player().pos;
        state.place_obstacle(Obstacle::new(ObstacleKind::Rock, 30.0, pos + Vec2::new(0.0, 5.0)));
        state.place_obstacle(Obstacle::new(ObstacleKind::Tree, 50.0, Vec2::new(100.0, 550.0)));
        tick(&mut state, TurnIntent::None);
        assert!(state.is_terminal());
        assert!(state.distance() > 0.0);

        state.restart();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.distance(), 0.0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.player().pos, Vec2::new(400.0, 50.0));
        assert_eq!(state.player().speed, 0.0);
        assert!(state.obstacles().is_empty());

        assert!(state.start());
        assert!(tick(&mut state, TurnIntent::None));
    }

    #[test]
    fn test_determinism() {
        let inputs = [TurnIntent::None, TurnIntent::Left, TurnIntent::Right];
        let mut a = GameState::new(99999, 800.0, 600.0);
        let mut b = GameState::new(99999, 800.0, 600.0);
        a.start();
        b.start();
        for i in 0..2000 {
            let intent = inputs[(i / 7) % 3];
            tick(&mut a, intent);
            tick(&mut b, intent);
        }
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.time_ticks(), b.time_ticks());
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.distance(), b.distance());
    }
}
