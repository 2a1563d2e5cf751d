//! Error types
//!
//! Only startup failures travel as `Result`. Per-tick input problems are
//! absorbed into `TurnIntent::None` by the input layer.

use thiserror::Error;

/// Errors surfaced to the caller
#[derive(Error, Debug)]
pub enum GameError {
    /// Camera or pose model could not be provisioned
    #[error("failed to initialize turn input: {0}")]
    InputInit(String),

    /// An operation needed an input source but the session has none
    #[error("no turn input source installed")]
    InputUnavailable,

    /// Pose model output was not valid JSON for a pose
    #[error("malformed pose payload: {0}")]
    PoseParse(#[from] serde_json::Error),

    /// A JavaScript call rejected or returned an unexpected value
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GameError::InputInit("camera permission denied".into());
        assert_eq!(
            err.to_string(),
            "failed to initialize turn input: camera permission denied"
        );
        assert_eq!(
            GameError::InputUnavailable.to_string(),
            "no turn input source installed"
        );
    }

    #[test]
    fn test_pose_parse_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GameError = parse.into();
        assert!(matches!(err, GameError::PoseParse(_)));
        assert!(err.to_string().starts_with("malformed pose payload"));
    }
}
