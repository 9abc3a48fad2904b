mod backend_rodio;
mod media;
mod render_loop;
mod shared;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use backend_rodio::RodioBackend;
pub use media::{HttpFetcher, Media, MediaFetcher};
pub use render_loop::RenderLoop;
pub use shared::{PlayerState, SharedPlayer, SharedStatus};
pub use transport::{Transport, TransportSettings, adjust_volume};

use crate::error::Result;
use crate::input::InputEvent;

pub const NOTICE_NO_EPISODE: &str = "No episode";
pub const NOTICE_FAILED: &str = "Playback failed";
pub const NOTICE_TIMED_OUT: &str = "Playback timed out";

/// Messages consumed by the controller thread.
pub enum ControlMessage {
    Input(InputEvent),
    Shutdown,
}

/// Adapter over a single media engine. Owns at most one session.
pub trait PlaybackBackend: Send {
    /// Release any current session, then open `media` as the new one
    fn load(&mut self, media: Media) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// No-op without a session
    fn stop(&mut self);
    fn seek(&mut self, delta_secs: f64) -> Result<()>;
    fn set_volume(&mut self, percent: u8);

    fn position(&self) -> f64;
    fn duration(&self) -> f64;
    fn has_ended(&self) -> bool;
    fn has_session(&self) -> bool;
    fn state(&self) -> BackendState;
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BackendState {
    Idle,
    Opening,
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum TransportState {
    Stopped,
    Loading,
    Playing,
    Paused,
    /// Shown for one frame after end-of-media, then folded into `Stopped`
    Finished,
}

impl TransportState {
    /// States in which a session is live and selection is locked
    pub fn is_active(self) -> bool {
        matches!(self, TransportState::Playing | TransportState::Paused)
    }
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportState::Stopped => write!(f, "stopped"),
            TransportState::Loading => write!(f, "loading"),
            TransportState::Playing => write!(f, "playing"),
            TransportState::Paused => write!(f, "paused"),
            TransportState::Finished => write!(f, "finished"),
        }
    }
}
