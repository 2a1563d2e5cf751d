//! Turn input abstraction
//!
//! The simulation only ever sees a ternary turn intent. Whatever produces it
//! (webcam pose estimation in the browser, a script in tests) sits behind
//! `TurnIntentSource`.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Steering request for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnIntent {
    Left,
    Right,
    #[default]
    None,
}

impl TurnIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnIntent::Left => "left",
            TurnIntent::Right => "right",
            TurnIntent::None => "none",
        }
    }

    /// Parse a label; anything unrecognized means no turn
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "left" => TurnIntent::Left,
            "right" => TurnIntent::Right,
            _ => TurnIntent::None,
        }
    }
}

/// Producer of one turn intent per tick
///
/// `detect_turn_direction` is the only suspend point of a tick and must never
/// fail: implementations map internal detection errors to `TurnIntent::None`.
/// `dispose` must be idempotent.
#[allow(async_fn_in_trait)]
pub trait TurnIntentSource {
    /// Provision camera/model resources
    async fn initialize(&mut self) -> Result<(), GameError>;

    /// Whether `initialize` has completed and detection can run
    fn is_ready(&self) -> bool;

    /// Whether the player is visible well enough to start the countdown
    async fn is_pose_visible(&mut self) -> bool {
        self.is_ready()
    }

    /// Latest turn intent
    async fn detect_turn_direction(&mut self) -> TurnIntent;

    /// Release camera/model resources
    fn dispose(&mut self);
}

/// Deterministic source that replays a fixed list of intents, then `None`
#[derive(Debug, Default)]
pub struct ScriptedIntents {
    script: VecDeque<TurnIntent>,
    fail_init: bool,
    ready: bool,
    pose_visible: bool,
    /// Shared so disposals stay observable after the source is replaced
    dispose_calls: Rc<Cell<u32>>,
    /// Counter value seen when `initialize` last succeeded
    disposals_at_init: Option<u32>,
}

impl ScriptedIntents {
    pub fn new(script: impl IntoIterator<Item = TurnIntent>) -> Self {
        Self {
            script: script.into_iter().collect(),
            pose_visible: true,
            ..Default::default()
        }
    }

    /// `count` copies of the same intent
    pub fn repeat(intent: TurnIntent, count: usize) -> Self {
        Self::new(std::iter::repeat_n(intent, count))
    }

    /// Make `initialize` fail, as a denied camera would
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Control what the readiness poll reports
    pub fn with_pose_visible(mut self, visible: bool) -> Self {
        self.pose_visible = visible;
        self
    }

    pub fn set_pose_visible(&mut self, visible: bool) {
        self.pose_visible = visible;
    }

    /// Intents not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Count `dispose` calls on a counter shared with other sources
    pub fn sharing_disposals(mut self, counter: Rc<Cell<u32>>) -> Self {
        self.dispose_calls = counter;
        self
    }

    /// Handle to the disposal counter, readable after this source is dropped
    pub fn disposal_counter(&self) -> Rc<Cell<u32>> {
        self.dispose_calls.clone()
    }

    /// Number of `dispose` calls on every source sharing this counter
    pub fn dispose_calls(&self) -> u32 {
        self.dispose_calls.get()
    }

    /// Disposal count observed when this source finished initializing
    pub fn disposals_at_init(&self) -> Option<u32> {
        self.disposals_at_init
    }
}

impl TurnIntentSource for ScriptedIntents {
    async fn initialize(&mut self) -> Result<(), GameError> {
        if self.fail_init {
            return Err(GameError::InputInit("scripted initialization failure".into()));
        }
        self.ready = true;
        self.disposals_at_init = Some(self.dispose_calls.get());
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn is_pose_visible(&mut self) -> bool {
        self.ready && self.pose_visible
    }

    async fn detect_turn_direction(&mut self) -> TurnIntent {
        self.script.pop_front().unwrap_or_default()
    }

    fn dispose(&mut self) {
        self.dispose_calls.set(self.dispose_calls.get() + 1);
        self.ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(TurnIntent::from_label("left"), TurnIntent::Left);
        assert_eq!(TurnIntent::from_label(" RIGHT "), TurnIntent::Right);
        assert_eq!(TurnIntent::from_label("none"), TurnIntent::None);
        assert_eq!(TurnIntent::from_label("jump"), TurnIntent::None);
        assert_eq!(TurnIntent::Left.as_str(), "left");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TurnIntent::Right).unwrap();
        assert_eq!(json, "\"right\"");
        let back: TurnIntent = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(back, TurnIntent::Left);
    }

    #[test]
    fn test_scripted_replays_then_none() {
        let mut source = ScriptedIntents::new([TurnIntent::Left, TurnIntent::Right]);
        pollster::block_on(async {
            source.initialize().await.unwrap();
            assert_eq!(source.detect_turn_direction().await, TurnIntent::Left);
            assert_eq!(source.detect_turn_direction().await, TurnIntent::Right);
            assert_eq!(source.detect_turn_direction().await, TurnIntent::None);
            assert_eq!(source.detect_turn_direction().await, TurnIntent::None);
        });
    }

    #[test]
    fn test_scripted_init_failure() {
        let mut source = ScriptedIntents::default().failing_init();
        let result = pollster::block_on(source.initialize());
        assert!(matches!(result, Err(GameError::InputInit(_))));
        assert!(!source.is_ready());
    }

    #[test]
    fn test_readiness_requires_init() {
        let mut source = ScriptedIntents::new([]);
        assert!(!pollster::block_on(source.is_pose_visible()));
        pollster::block_on(source.initialize()).unwrap();
        assert!(pollster::block_on(source.is_pose_visible()));
        source.set_pose_visible(false);
        assert!(!pollster::block_on(source.is_pose_visible()));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut source = ScriptedIntents::new([]);
        pollster::block_on(source.initialize()).unwrap();
        source.dispose();
        source.dispose();
        assert!(!source.is_ready());
        assert_eq!(source.dispose_calls(), 2);
    }

    #[test]
    fn test_shared_disposal_counter() {
        let mut first = ScriptedIntents::new([]);
        let counter = first.disposal_counter();
        let mut second = ScriptedIntents::new([]).sharing_disposals(counter.clone());
        first.dispose();
        drop(first);
        assert_eq!(counter.get(), 1);

        pollster::block_on(second.initialize()).unwrap();
        assert_eq!(second.disposals_at_init(), Some(1));
        second.dispose();
        assert_eq!(counter.get(), 2);
    }
}
