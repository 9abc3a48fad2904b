//! In-memory backend and resolver used by the unit tests.

use super::{BackendState, Media, MediaFetcher, PlaybackBackend};
use crate::{PlaybackItem, PlayerError, error::Result, feed::FeedResolver};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Resume,
    Stop,
    Seek(f64),
    Volume(u8),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    session: bool,
    started: bool,
    paused: bool,
    ended: bool,
    position: f64,
    duration: f64,
    fail_load: bool,
    hold_opening: bool,
    live_sessions: usize,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let fake = FakeBackend::default();
        fake.with(|i| i.duration = 1800.0);
        fake
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().unwrap();
        f(&mut inner)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|i| i.calls.clone())
    }

    pub fn live_sessions(&self) -> usize {
        self.with(|i| i.live_sessions)
    }

    pub fn set_duration(&self, secs: f64) {
        self.with(|i| i.duration = secs);
    }

    pub fn set_position(&self, secs: f64) {
        self.with(|i| i.position = secs);
    }

    pub fn set_ended(&self) {
        self.with(|i| i.ended = true);
    }

    pub fn fail_next_load(&self) {
        self.with(|i| i.fail_load = true);
    }

    /// Keep reporting `Opening` after `play` until released
    pub fn hold_opening(&self, hold: bool) {
        self.with(|i| i.hold_opening = hold);
    }
}

impl PlaybackBackend for FakeBackend {
    fn load(&mut self, media: Media) -> Result<()> {
        let url = media.url;
        self.with(|i| {
            i.calls.push(Call::Load(url.clone()));
            if i.session {
                i.live_sessions -= 1;
            }
            i.session = false;
            i.started = false;
            i.paused = false;
            i.ended = false;
            i.position = 0.0;

            if std::mem::take(&mut i.fail_load) {
                return Err(PlayerError::Backend(format!("cannot open {url}")));
            }
            i.session = true;
            i.live_sessions += 1;
            Ok(())
        })
    }

    fn play(&mut self) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Play);
            match i.session {
                true => {
                    i.started = true;
                    Ok(())
                }
                false => Err(PlayerError::NoSession),
            }
        })
    }

    fn pause(&mut self) {
        self.with(|i| {
            i.calls.push(Call::Pause);
            i.paused = true;
        });
    }

    fn resume(&mut self) {
        self.with(|i| {
            i.calls.push(Call::Resume);
            i.paused = false;
        });
    }

    fn stop(&mut self) {
        self.with(|i| {
            i.calls.push(Call::Stop);
            if i.session {
                i.live_sessions -= 1;
            }
            i.session = false;
            i.started = false;
            i.ended = false;
            i.position = 0.0;
        });
    }

    fn seek(&mut self, delta_secs: f64) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Seek(delta_secs));
            i.position = (i.position + delta_secs).clamp(0.0, i.duration);
            Ok(())
        })
    }

    fn set_volume(&mut self, percent: u8) {
        self.with(|i| i.calls.push(Call::Volume(percent)));
    }

    fn position(&self) -> f64 {
        self.with(|i| i.position)
    }

    fn duration(&self) -> f64 {
        self.with(|i| match i.session {
            true => i.duration,
            false => 0.0,
        })
    }

    fn has_ended(&self) -> bool {
        self.with(|i| i.session && i.ended)
    }

    fn has_session(&self) -> bool {
        self.with(|i| i.session)
    }

    fn state(&self) -> BackendState {
        self.with(|i| match (i.session, i.ended, i.started, i.hold_opening, i.paused) {
            (false, ..) => BackendState::Idle,
            (true, true, ..) => BackendState::Ended,
            (true, false, false, ..) | (true, false, true, true, _) => BackendState::Opening,
            (true, false, true, false, true) => BackendState::Paused,
            (true, false, true, false, false) => BackendState::Playing,
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeResolver {
    items: Arc<Mutex<HashMap<String, PlaybackItem>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl FakeResolver {
    pub fn with_item(self, source: &str, item: PlaybackItem) -> Self {
        self.items.lock().unwrap().insert(source.to_string(), item);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl FeedResolver for FakeResolver {
    fn resolve_latest(&self, source: &str) -> Option<PlaybackItem> {
        self.lookups.lock().unwrap().push(source.to_string());
        self.items.lock().unwrap().get(source).cloned()
    }
}

/// Hands back empty media after an optional delay.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    delay: Duration,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn with_delay(delay: Duration) -> Self {
        FakeFetcher {
            delay,
            ..FakeFetcher::default()
        }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl MediaFetcher for FakeFetcher {
    fn fetch(&self, url: &str, _deadline: Instant) -> Result<Media> {
        thread::sleep(self.delay);
        self.fetched.lock().unwrap().push(url.to_string());
        Ok(Media::new(url, Vec::new()))
    }
}
