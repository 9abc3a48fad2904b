use super::{PlaybackBackend, TransportState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// The status record every frame is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedStatus {
    pub selected_name: String,
    pub title: String,
    pub state: TransportState,
    pub volume: u8,
    pub elapsed: f64,
    pub duration: f64,
    pub notice: Option<String>,
}

impl SharedStatus {
    pub fn new(selected_name: impl Into<String>, volume: u8) -> Self {
        SharedStatus {
            selected_name: selected_name.into(),
            title: String::new(),
            state: TransportState::Stopped,
            volume: volume.min(100),
            elapsed: 0.0,
            duration: 0.0,
            notice: None,
        }
    }

    /// Fraction of the episode played. Zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration > 0.0 {
            true => (self.elapsed / self.duration).clamp(0.0, 1.0),
            false => 0.0,
        }
    }

    fn set_elapsed(&mut self, secs: f64) {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self.elapsed = match self.duration > 0.0 {
            true => secs.min(self.duration),
            false => secs,
        };
    }
}

/// Status and backend, guarded together. Every method here runs inside a
/// single critical section of the owning `SharedPlayer`.
pub struct PlayerState {
    pub status: SharedStatus,
    pub(crate) backend: Box<dyn PlaybackBackend>,
}

impl PlayerState {
    /// Release the session and zero elapsed time. Safe when already stopped.
    pub fn stop_session(&mut self) {
        if self.backend.has_session() {
            self.backend.stop();
            info!(title = %self.status.title, "Session released");
        }
        self.status.elapsed = 0.0;
        if self.status.state != TransportState::Stopped {
            debug!(from = %self.status.state, "-> stopped");
            self.status.state = TransportState::Stopped;
        }
    }

    /// Record the volume and push it to a live session.
    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.status.volume = percent;
        if self.backend.has_session() {
            self.backend.set_volume(percent);
        }
    }

    /// Pull position and end-of-media from the backend while playing.
    pub(crate) fn poll_backend(&mut self) {
        if self.status.state != TransportState::Playing {
            return;
        }

        if self.backend.has_ended() {
            self.backend.stop();
            self.status.elapsed = 0.0;
            self.status.state = TransportState::Finished;
            info!(title = %self.status.title, "Episode finished");
            return;
        }

        if self.status.duration <= 0.0 {
            self.status.duration = self.backend.duration().max(0.0);
        }
        self.refresh_elapsed();
    }

    pub(crate) fn refresh_elapsed(&mut self) {
        let position = self.backend.position();
        self.status.set_elapsed(position);
    }

    /// Copy the status for one frame. `Finished` is handed out once and then
    /// folded into `Stopped`.
    pub(crate) fn take_snapshot(&mut self) -> SharedStatus {
        let snapshot = self.status.clone();
        if self.status.state == TransportState::Finished {
            self.status.state = TransportState::Stopped;
        }
        snapshot
    }
}

/// Cloneable handle to the one lock guarding status and session.
#[derive(Clone)]
pub struct SharedPlayer {
    inner: Arc<Mutex<PlayerState>>,
}

impl SharedPlayer {
    pub fn new(backend: Box<dyn PlaybackBackend>, status: SharedStatus) -> Self {
        SharedPlayer {
            inner: Arc::new(Mutex::new(PlayerState { status, backend })),
        }
    }

    /// A panic inside a critical section leaves the record consistent at
    /// statement boundaries, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> SharedStatus {
        self.lock().status.clone()
    }

    pub fn stop(&self) {
        self.lock().stop_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{
        Media,
        fake::{Call, FakeBackend},
    };

    fn player() -> (SharedPlayer, FakeBackend) {
        let fake = FakeBackend::new();
        let shared = SharedPlayer::new(Box::new(fake.clone()), SharedStatus::new("Show", 50));
        (shared, fake)
    }

    #[test]
    fn progress_guards_zero_duration() {
        let mut status = SharedStatus::new("Show", 50);
        status.elapsed = 12.0;
        assert_eq!(status.progress(), 0.0);

        status.duration = 48.0;
        assert_eq!(status.progress(), 0.25);
    }

    #[test]
    fn elapsed_never_exceeds_duration() {
        let mut status = SharedStatus::new("Show", 50);
        status.duration = 100.0;
        status.set_elapsed(130.0);
        assert_eq!(status.elapsed, 100.0);
        status.set_elapsed(-4.0);
        assert_eq!(status.elapsed, 0.0);
    }

    #[test]
    fn stop_when_stopped_is_a_noop() {
        let (shared, fake) = player();
        let before = shared.status();

        shared.stop();
        shared.stop();

        assert_eq!(shared.status(), before);
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn stop_clears_session_and_elapsed_together() {
        let (shared, fake) = player();
        {
            let mut p = shared.lock();
            p.backend.load(Media::new("https://media.test/a.mp3", Vec::new())).unwrap();
            p.status.state = TransportState::Playing;
            p.status.elapsed = 42.0;
        }

        shared.stop();

        let status = shared.status();
        assert_eq!(status.state, TransportState::Stopped);
        assert_eq!(status.elapsed, 0.0);
        assert_eq!(fake.live_sessions(), 0);
        assert!(fake.calls().contains(&Call::Stop));
    }

    #[test]
    fn volume_is_recorded_without_a_session() {
        let (shared, fake) = player();
        shared.lock().set_volume(80);

        assert_eq!(shared.status().volume, 80);
        assert!(!fake.calls().contains(&Call::Volume(80)));
    }

    #[test]
    fn finished_is_snapshotted_once() {
        let (shared, _fake) = player();
        shared.lock().status.state = TransportState::Finished;

        let first = shared.lock().take_snapshot();
        let second = shared.lock().take_snapshot();

        assert_eq!(first.state, TransportState::Finished);
        assert_eq!(second.state, TransportState::Stopped);
    }
}
