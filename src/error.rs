//! Error types for the playback core.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// The engine could not open, decode or drive a resource
    #[error("Backend error: {0}")]
    Backend(String),

    /// Feed unreachable, unparseable, or without an audio entry
    #[error("Feed resolution error: {0}")]
    Resolution(String),

    /// The backend never confirmed playback
    #[error("Playback did not start within {0:?}")]
    StartupTimeout(Duration),

    #[error("No active playback session")]
    NoSession,

    /// Shutdown arrived while a session was still starting
    #[error("Loading cancelled by shutdown")]
    Cancelled,

    /// Audio output device could not be opened
    #[error("Audio output error: {0}")]
    Output(String),
}

impl PlayerError {
    /// Short text for the status line of the display.
    pub fn notice(&self) -> &'static str {
        match self {
            PlayerError::Resolution(_) => crate::player::NOTICE_NO_EPISODE,
            PlayerError::StartupTimeout(_) => crate::player::NOTICE_TIMED_OUT,
            _ => crate::player::NOTICE_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;
