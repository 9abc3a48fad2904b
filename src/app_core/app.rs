use crate::{
    AppConfig, Catalog,
    display::Marquee,
    feed::{RssResolver, http_agent},
    input::KeyboardEncoders,
    overwrite_line,
    player::{
        ControlMessage, HttpFetcher, RenderLoop, RodioBackend, SharedPlayer, SharedStatus,
        Transport, TransportSettings,
    },
    tui::TerminalDisplay,
};
use anyhow::{Result, anyhow};
use crossbeam_channel::{bounded, unbounded};
use std::{sync::Arc, thread::JoinHandle};
use tracing::{info, warn};

pub struct Podbox {
    config: AppConfig,
    catalog: Arc<Catalog>,
    shared: SharedPlayer,
}

impl Podbox {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let catalog = Arc::new(Catalog::new(config.catalog.clone())?);

        let backend = RodioBackend::new()?;
        let status = SharedStatus::new(
            catalog.get(0).name.clone(),
            config.playback.default_volume,
        );
        let shared = SharedPlayer::new(Box::new(backend), status);

        Ok(Podbox {
            config,
            catalog,
            shared,
        })
    }

    pub fn run(self) -> Result<()> {
        let (command_tx, command_rx) = unbounded();
        let (quit_tx, quit_rx) = bounded::<()>(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let quit_on_signal = quit_tx.clone();
        ctrlc::set_handler(move || {
            let _ = quit_on_signal.try_send(());
        })?;

        let keyboard = KeyboardEncoders::new(&self.config.keys)?;

        let terminal = ratatui::init();
        let teardown = Teardown(self.shared.clone());

        let transport = Transport::new(
            self.shared.clone(),
            Arc::clone(&self.catalog),
            Box::new(RssResolver::new(&self.config.feed)),
            Arc::new(HttpFetcher::new(http_agent(&self.config.feed))),
            TransportSettings::from(&self.config.playback),
        )
        .spawn(command_rx)?;

        let display = &self.config.display;
        let render = RenderLoop::new(
            self.shared.clone(),
            Box::new(TerminalDisplay::new(terminal, display.marquee_gap)),
            Marquee::new(display.marquee_step, display.marquee_gap),
            display.refresh_period(),
        )
        .spawn(shutdown_rx.clone())?;

        let keys = keyboard.spawn(command_tx.clone(), quit_tx, shutdown_rx)?;

        info!(entries = self.catalog.len(), "Podbox running");
        let _ = quit_rx.recv();
        info!("Shutting down");

        let _ = command_tx.send(ControlMessage::Shutdown);
        drop(shutdown_tx);

        join("transport", transport)?;
        join("render", render)?;
        join("keyboard", keys)?;

        drop(teardown);
        overwrite_line("Goodbye from podbox!\n")?;

        Ok(())
    }
}

/// Stops any live session and hands the terminal back, on every exit path.
struct Teardown(SharedPlayer);

impl Drop for Teardown {
    fn drop(&mut self) {
        self.0.stop();
        ratatui::restore();
    }
}

fn join(name: &str, handle: JoinHandle<()>) -> Result<()> {
    handle.join().map_err(|_| {
        warn!(thread = name, "Worker panicked");
        anyhow!("{name} thread panicked")
    })
}
