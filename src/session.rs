//! Game session
//!
//! Owns one `GameState` and the turn input source feeding it. Every operation
//! takes `&mut self`, so ticks cannot overlap: a frame awaits its single turn
//! intent, runs the tick and hands back the events before the caller may
//! schedule the next one.

use crate::error::GameError;
use crate::input::TurnIntentSource;
use crate::pregame::{PreGame, PreGameSignal};
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::tuning::Tuning;

pub struct Session<S: TurnIntentSource> {
    state: GameState,
    source: Option<S>,
    pregame: PreGame,
    /// Source released for the current run
    disposed: bool,
}

impl<S: TurnIntentSource> Session<S> {
    pub fn new(seed: u64, width: f32, height: f32, source: S) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default(), source)
    }

    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning, source: S) -> Self {
        Self {
            state: GameState::with_tuning(seed, width, height, tuning),
            source: Some(source),
            pregame: PreGame::default(),
            disposed: false,
        }
    }

    /// Provision the input source; on failure the game never leaves Idle
    ///
    /// A failed source is released at once, since initialization may have
    /// acquired the camera before it gave up.
    pub async fn initialize(&mut self) -> Result<(), GameError> {
        let source = self.source.as_mut().ok_or(GameError::InputUnavailable)?;
        match source.initialize().await {
            Ok(()) => {
                log::info!("Turn input initialized");
                Ok(())
            }
            Err(e) => {
                log::error!("Turn input failed to initialize: {}", e);
                self.release_source();
                Err(e)
            }
        }
    }

    /// Instructions dismissed: start polling for the player
    pub fn begin_pregame(&mut self) {
        if self.state.phase() != GamePhase::Idle {
            log::warn!("Pre-game requested while {:?}", self.state.phase());
            return;
        }
        self.pregame = PreGame::begin();
        log::info!("Waiting for player to get into position");
    }

    /// Drive readiness polling and the countdown by `dt_ms`
    ///
    /// Starts the run when the countdown completes.
    pub async fn update_pregame(&mut self, dt_ms: f64) -> Option<PreGameSignal> {
        let signal = self.pregame.advance(dt_ms)?;
        match signal {
            PreGameSignal::PollDue => {
                let visible = match self.source.as_mut() {
                    Some(source) if source.is_ready() => source.is_pose_visible().await,
                    _ => false,
                };
                if visible {
                    log::info!("Player detected, starting countdown");
                } else {
                    log::debug!("Player not visible yet");
                }
                Some(self.pregame.report_pose(visible).unwrap_or(signal))
            }
            PreGameSignal::CountdownComplete => {
                self.state.start();
                Some(signal)
            }
            _ => Some(signal),
        }
    }

    /// Run one frame: await one turn intent, tick, return the events
    ///
    /// Does nothing unless the game is running. The frame that ends the run
    /// also releases the input source.
    pub async fn frame(&mut self) -> Vec<GameEvent> {
        if self.state.phase() != GamePhase::Running {
            return Vec::new();
        }
        let Some(source) = self.source.as_mut() else {
            log::warn!("Running without a turn input source");
            return Vec::new();
        };

        let intent = source.detect_turn_direction().await;
        tick(&mut self.state, intent);

        if self.state.is_terminal() {
            log::info!("Game over with score {}", self.state.score());
            self.release_source();
        }
        self.state.drain_events()
    }

    /// Replace the input source and reset for a new run
    ///
    /// The old source is released first. The new one is initialized and, on
    /// success, the pre-game sequence begins again.
    pub async fn restart(&mut self, source: S) -> Result<(), GameError> {
        self.release_source();
        self.source = Some(source);
        self.disposed = false;
        self.pregame = PreGame::default();
        self.state.restart();
        log::info!("Restarting game");

        self.initialize().await?;
        self.begin_pregame();
        Ok(())
    }

    /// Canvas size changed; the run continues
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    fn release_source(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(source) = self.source.as_mut() {
            source.dispose();
            log::info!("Turn input released");
        }
        self.disposed = true;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state for scripted setups (obstacle placement in tests and demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn pregame(&self) -> &PreGame {
        &self.pregame
    }

    /// Events queued outside of `frame` (e.g. the score reset on restart)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
