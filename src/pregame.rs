//! Pre-game sequencing
//!
//! After the instructions are dismissed the game polls the input source until
//! the player is visible, then counts down 3-2-1 and starts the run. The
//! machine is driven by the caller's frame clock; it never sleeps or spawns
//! timers of its own.

/// Readiness poll period (ms)
pub const POLL_INTERVAL_MS: f64 = 500.0;
/// First number shown by the countdown
pub const COUNTDOWN_FROM: u32 = 3;
/// Time each countdown number stays on screen (ms)
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;

/// Where the pre-game sequence is
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PreGame {
    /// Instructions still up; nothing happens
    #[default]
    Inactive,
    /// Polling the input source for a visible player
    WaitingForPose { since_poll_ms: f64 },
    /// Counting down; `remaining` is the number on screen
    Countdown { remaining: u32, elapsed_ms: f64 },
    /// Countdown finished; the run has been started
    Done,
}

/// What the caller should react to after advancing the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreGameSignal {
    /// Time to check whether the player is visible; answer with `report_pose`
    PollDue,
    /// Player visible, countdown begins at `COUNTDOWN_FROM`
    Ready,
    /// Countdown now shows this number
    CountdownStep(u32),
    /// Countdown over; start the run
    CountdownComplete,
}

impl PreGame {
    /// Start (or restart) waiting for the player
    pub fn begin() -> Self {
        PreGame::WaitingForPose { since_poll_ms: 0.0 }
    }

    /// Advance the clock by `dt_ms`
    pub fn advance(&mut self, dt_ms: f64) -> Option<PreGameSignal> {
        match self {
            PreGame::WaitingForPose { since_poll_ms } => {
                *since_poll_ms += dt_ms;
                if *since_poll_ms >= POLL_INTERVAL_MS {
                    *since_poll_ms -= POLL_INTERVAL_MS;
                    Some(PreGameSignal::PollDue)
                } else {
                    None
                }
            }
            PreGame::Countdown {
                remaining,
                elapsed_ms,
            } => {
                *elapsed_ms += dt_ms;
                if *elapsed_ms < COUNTDOWN_STEP_MS {
                    return None;
                }
                *elapsed_ms -= COUNTDOWN_STEP_MS;
                *remaining -= 1;
                if *remaining == 0 {
                    *self = PreGame::Done;
                    Some(PreGameSignal::CountdownComplete)
                } else {
                    Some(PreGameSignal::CountdownStep(*remaining))
                }
            }
            PreGame::Inactive | PreGame::Done => None,
        }
    }

    /// Answer a `PollDue` with the readiness result
    pub fn report_pose(&mut self, visible: bool) -> Option<PreGameSignal> {
        match self {
            PreGame::WaitingForPose { .. } if visible => {
                *self = PreGame::Countdown {
                    remaining: COUNTDOWN_FROM,
                    elapsed_ms: 0.0,
                };
                Some(PreGameSignal::Ready)
            }
            _ => None,
        }
    }

    /// Number the countdown shows, if counting
    pub fn countdown_value(&self) -> Option<u32> {
        match self {
            PreGame::Countdown { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, PreGame::WaitingForPose { .. })
    }

    pub fn is_done(&self) -> bool {
        *self == PreGame::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_ignores_time() {
        let mut pregame = PreGame::default();
        assert_eq!(pregame.advance(10_000.0), None);
        assert_eq!(pregame.report_pose(true), None);
        assert_eq!(pregame, PreGame::Inactive);
    }

    #[test]
    fn test_polls_every_interval() {
        let mut pregame = PreGame::begin();
        assert_eq!(pregame.advance(300.0), None);
        assert_eq!(pregame.advance(200.0), Some(PreGameSignal::PollDue));
        assert_eq!(pregame.report_pose(false), None);
        assert!(pregame.is_waiting());
        assert_eq!(pregame.advance(499.0), None);
        assert_eq!(pregame.advance(1.0), Some(PreGameSignal::PollDue));
    }

    #[test]
    fn test_full_countdown() {
        let mut pregame = PreGame::begin();
        assert_eq!(pregame.advance(500.0), Some(PreGameSignal::PollDue));
        assert_eq!(pregame.report_pose(true), Some(PreGameSignal::Ready));
        assert_eq!(pregame.countdown_value(), Some(3));

        assert_eq!(pregame.advance(999.0), None);
        assert_eq!(pregame.advance(1.0), Some(PreGameSignal::CountdownStep(2)));
        assert_eq!(pregame.advance(1000.0), Some(PreGameSignal::CountdownStep(1)));
        assert_eq!(pregame.countdown_value(), Some(1));
        assert_eq!(pregame.advance(1000.0), Some(PreGameSignal::CountdownComplete));
        assert!(pregame.is_done());
        assert_eq!(pregame.advance(1000.0), None);
    }

    #[test]
    fn test_leftover_time_carries_over() {
        let mut pregame = PreGame::begin();
        pregame.advance(500.0);
        pregame.report_pose(true);
        assert_eq!(pregame.advance(1500.0), Some(PreGameSignal::CountdownStep(2)));
        assert_eq!(pregame.advance(500.0), Some(PreGameSignal::CountdownStep(1)));
    }

    #[test]
    fn test_report_outside_waiting_is_ignored() {
        let mut pregame = PreGame::Countdown {
            remaining: 2,
            elapsed_ms: 0.0,
        };
        assert_eq!(pregame.report_pose(true), None);
        assert_eq!(pregame.countdown_value(), Some(2));
    }
}
