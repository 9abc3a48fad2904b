use super::{
    BackendState, ControlMessage, Media, MediaFetcher, NOTICE_NO_EPISODE, PlayerState,
    SharedPlayer, TransportState,
};
use crate::{
    Catalog, CatalogEntry, PlaybackItem, PlayerError,
    config::PlaybackConfig,
    error::Result,
    feed::FeedResolver,
    input::{EncoderEvent, EncoderId, InputEvent},
};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub default_volume: u8,
    pub volume_step: u8,
    pub seek_secs: f64,
    pub poll_interval: Duration,
    pub startup_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        TransportSettings::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for TransportSettings {
    fn from(config: &PlaybackConfig) -> Self {
        TransportSettings {
            default_volume: config.default_volume.min(100),
            volume_step: config.volume_step,
            seek_secs: f64::from(config.seek_secs),
            poll_interval: config.poll_interval(),
            startup_timeout: config.startup_timeout(),
        }
    }
}

/// The transport state machine. Owned by the controller thread, which feeds
/// it encoder events one at a time.
pub struct Transport {
    shared: SharedPlayer,
    catalog: Arc<Catalog>,
    resolver: Box<dyn FeedResolver>,
    fetcher: Arc<dyn MediaFetcher>,
    settings: TransportSettings,
    selected: usize,
    /// Command queue, serviced for volume input while a session starts
    inbox: Option<Receiver<ControlMessage>>,
    shutting_down: bool,
}

impl Transport {
    pub fn new(
        shared: SharedPlayer,
        catalog: Arc<Catalog>,
        resolver: Box<dyn FeedResolver>,
        fetcher: Arc<dyn MediaFetcher>,
        settings: TransportSettings,
    ) -> Self {
        shared.lock().status.selected_name = catalog.get(0).name.clone();

        Transport {
            shared,
            catalog,
            resolver,
            fetcher,
            settings,
            selected: 0,
            inbox: None,
            shutting_down: false,
        }
    }

    pub fn spawn(mut self, commands: Receiver<ControlMessage>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("transport".into())
            .spawn(move || self.run(commands))
    }

    fn run(&mut self, commands: Receiver<ControlMessage>) {
        self.inbox = Some(commands.clone());

        while !self.shutting_down {
            match commands.recv() {
                Ok(ControlMessage::Input(event)) => self.handle_event(event),
                Ok(ControlMessage::Shutdown) | Err(_) => break,
            }
        }
        info!("Transport controller exiting");
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        debug!(encoder = %event.encoder, action = ?event.action, "Input");
        match event.encoder {
            EncoderId::Selection => self.on_selection(event.action),
            EncoderId::Volume => self.on_volume(event.action),
        }
    }

    fn on_selection(&mut self, action: EncoderEvent) {
        let state = self.shared.lock().status.state;

        match state {
            s if s.is_active() => self.on_active(action),
            TransportState::Loading => debug!(?action, "Ignoring selection input while loading"),
            _ => match action {
                EncoderEvent::RotateCw => self.select(self.catalog.next_index(self.selected)),
                EncoderEvent::RotateCcw => self.select(self.catalog.prev_index(self.selected)),
                EncoderEvent::ButtonPress => self.start_selected(),
            },
        }
    }

    fn select(&mut self, idx: usize) {
        self.selected = idx;
        let name = &self.catalog.get(idx).name;

        let mut player = self.shared.lock();
        player.status.selected_name = name.clone();
        player.status.notice = None;
        debug!(idx, name = %name, "Selection changed");
    }

    /// Seek and pause/resume. The state is checked again under the lock since
    /// the render loop may have finished the episode in the meantime.
    fn on_active(&mut self, action: EncoderEvent) {
        let seek = self.settings.seek_secs;
        let mut player = self.shared.lock();

        match (action, player.status.state) {
            (EncoderEvent::RotateCw, TransportState::Playing | TransportState::Paused) => {
                seek_by(&mut player, seek)
            }
            (EncoderEvent::RotateCcw, TransportState::Playing | TransportState::Paused) => {
                seek_by(&mut player, -seek)
            }
            (EncoderEvent::ButtonPress, TransportState::Playing) => {
                player.backend.pause();
                player.status.state = TransportState::Paused;
                info!("-> paused");
            }
            (EncoderEvent::ButtonPress, TransportState::Paused) => {
                player.backend.resume();
                player.status.state = TransportState::Playing;
                info!("-> playing");
            }
            (_, state) => debug!(%state, ?action, "Session no longer active, input dropped"),
        }
    }

    fn on_volume(&mut self, action: EncoderEvent) {
        let mut player = self.shared.lock();
        let current = player.status.volume;
        let next = adjust_volume(
            current,
            action,
            self.settings.volume_step,
            self.settings.default_volume,
        );

        player.set_volume(next);
        debug!(from = current, to = next, "Volume");
    }

    fn start_selected(&mut self) {
        let entry = self.catalog.get(self.selected).clone();
        info!(name = %entry.name, "Resolving latest episode");

        // Feed I/O happens outside the lock
        let Some(item) = self.resolver.resolve_latest(&entry.source) else {
            warn!(name = %entry.name, "No playable episode");
            let mut player = self.shared.lock();
            player.status.state = TransportState::Stopped;
            player.status.notice = Some(NOTICE_NO_EPISODE.to_string());
            return;
        };

        match self.begin_session(&entry, &item) {
            Ok(()) => {}
            Err(PlayerError::Cancelled) => {
                info!(url = %item.media_url, "Loading abandoned");
                self.shared.lock().stop_session();
            }
            Err(e) => {
                warn!(error = %e, url = %item.media_url, "Playback failed to start");
                let mut player = self.shared.lock();
                player.stop_session();
                player.status.notice = Some(e.notice().to_string());
            }
        }
    }

    /// Fetch, load and play one item. The fetch and the startup wait share
    /// one deadline and both run without the lock held.
    fn begin_session(&mut self, entry: &CatalogEntry, item: &PlaybackItem) -> Result<()> {
        let started = Instant::now();
        let deadline = started + self.settings.startup_timeout;

        {
            let mut player = self.shared.lock();
            player.status.selected_name = entry.name.clone();
            player.status.title = item.title.clone();
            player.status.notice = None;
            player.status.elapsed = 0.0;
            player.status.duration = 0.0;
            player.status.state = TransportState::Loading;
            info!(title = %item.title, "-> loading");
        }

        let media = self.fetch_media(&item.media_url, deadline)?;

        {
            let mut player = self.shared.lock();
            let volume = player.status.volume;
            player.backend.load(media)?;
            player.backend.set_volume(volume);
            player.backend.play()?;
        }

        self.await_playing(started, deadline)
    }

    /// Bring the episode into memory on a worker thread. Volume input keeps
    /// being applied meanwhile.
    fn fetch_media(&mut self, url: &str, deadline: Instant) -> Result<Media> {
        let (tx, rx) = bounded(1);
        let fetcher = Arc::clone(&self.fetcher);
        let target = url.to_string();

        thread::Builder::new()
            .name("fetch".into())
            .spawn(move || {
                let _ = tx.send(fetcher.fetch(&target, deadline));
            })
            .map_err(|e| PlayerError::Backend(e.to_string()))?;

        loop {
            match rx.try_recv() {
                Ok(fetched) => return fetched,
                Err(TryRecvError::Disconnected) => {
                    return Err(PlayerError::Backend("media fetch worker died".to_string()));
                }
                Err(TryRecvError::Empty) => {}
            }

            if Instant::now() >= deadline {
                return Err(PlayerError::StartupTimeout(self.settings.startup_timeout));
            }
            self.idle(self.settings.poll_interval)?;
        }
    }

    /// Bounded wait for the backend to confirm playback. The lock is released
    /// between polls so the render loop keeps drawing the loading state.
    fn await_playing(&mut self, started: Instant, deadline: Instant) -> Result<()> {
        loop {
            {
                let mut player = self.shared.lock();
                match player.backend.state() {
                    BackendState::Playing => {
                        player.status.duration = player.backend.duration().max(0.0);
                        player.status.elapsed = 0.0;
                        player.status.state = TransportState::Playing;
                        info!(
                            duration = player.status.duration,
                            waited_ms = started.elapsed().as_millis() as u64,
                            "-> playing"
                        );
                        return Ok(());
                    }
                    BackendState::Idle | BackendState::Ended => {
                        return Err(PlayerError::Backend(
                            "playback ended before it started".to_string(),
                        ));
                    }
                    BackendState::Opening | BackendState::Paused => {}
                }
            }

            if Instant::now() >= deadline {
                return Err(PlayerError::StartupTimeout(self.settings.startup_timeout));
            }
            self.idle(self.settings.poll_interval)?;
        }
    }

    /// Wait up to `timeout` for a queued command while a session starts.
    /// Volume input is applied at once, selection input is dropped, and a
    /// shutdown aborts the start.
    fn idle(&mut self, timeout: Duration) -> Result<()> {
        let message = match &self.inbox {
            Some(inbox) => match inbox.recv_timeout(timeout) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => return Ok(()),
                Err(RecvTimeoutError::Disconnected) => ControlMessage::Shutdown,
            },
            None => {
                thread::sleep(timeout);
                return Ok(());
            }
        };

        match message {
            ControlMessage::Input(event) if event.encoder == EncoderId::Volume => {
                self.on_volume(event.action);
                Ok(())
            }
            ControlMessage::Input(event) => {
                debug!(action = ?event.action, "Ignoring selection input while loading");
                Ok(())
            }
            ControlMessage::Shutdown => {
                self.shutting_down = true;
                Err(PlayerError::Cancelled)
            }
        }
    }
}

fn seek_by(player: &mut PlayerState, delta: f64) {
    match player.backend.seek(delta) {
        Ok(()) => {
            player.refresh_elapsed();
            debug!(delta, elapsed = player.status.elapsed, "Seek");
        }
        Err(e) => warn!(error = %e, delta, "Seek failed"),
    }
}

/// Next volume for a volume-encoder event. Muting from silence restores
/// `default`.
pub fn adjust_volume(current: u8, action: EncoderEvent, step: u8, default: u8) -> u8 {
    match action {
        EncoderEvent::RotateCw => current.saturating_add(step).min(100),
        EncoderEvent::RotateCcw => current.min(100).saturating_sub(step),
        EncoderEvent::ButtonPress => match current > 0 {
            true => 0,
            false => default.min(100),
        },
    }
}
