use super::{BackendState, Media, PlaybackBackend};
use crate::error::{PlayerError, Result};
use crossbeam_channel::{Sender, bounded};
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use std::{
    io::Cursor,
    path::Path,
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Media engine built on a rodio sink. Episodes arrive fully in memory, so
/// decoding here is seekable and never touches the network.
pub struct RodioBackend {
    sink: Sink,
    duration: f64,
    has_session: bool,
    started: bool,
    _output: OutputThread,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let (sink, output) = open_output()?;

        Ok(Self {
            sink,
            duration: 0.0,
            has_session: false,
            started: false,
            _output: output,
        })
    }
}

fn decode(media: Media) -> Result<Decoder<Cursor<Vec<u8>>>> {
    let len = media.bytes.len() as u64;
    let mut builder = Decoder::builder()
        .with_data(Cursor::new(media.bytes))
        .with_byte_len(len)
        .with_coarse_seek(true)
        .with_seekable(true);

    if let Some(hint) = format_hint(&media.url) {
        builder = builder.with_hint(hint);
    }
    if let Some(mime) = &media.mime {
        builder = builder.with_mime_type(mime);
    }

    builder
        .build()
        .map_err(|e| PlayerError::Backend(e.to_string()))
}

impl PlaybackBackend for RodioBackend {
    fn load(&mut self, media: Media) -> Result<()> {
        self.stop();

        let url = media.url.clone();
        let source = decode(media)?;
        self.duration = source
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        self.sink.clear();
        self.sink.append(source);
        self.has_session = true;
        self.started = false;

        info!(%url, duration = self.duration, "Episode loaded");
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if !self.has_session {
            return Err(PlayerError::NoSession);
        }
        self.sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn resume(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        if !self.has_session {
            return;
        }
        self.sink.clear();
        self.has_session = false;
        self.started = false;
        self.duration = 0.0;
    }

    fn seek(&mut self, delta_secs: f64) -> Result<()> {
        if !self.has_session {
            return Err(PlayerError::NoSession);
        }

        let target = seek_target(self.position(), delta_secs, self.duration);
        self.sink
            .try_seek(Duration::from_secs_f64(target))
            .map_err(|e| PlayerError::Backend(e.to_string()))
    }

    fn set_volume(&mut self, percent: u8) {
        self.sink.set_volume(f32::from(percent.min(100)) / 100.0);
    }

    fn position(&self) -> f64 {
        match self.has_session {
            true => self.sink.get_pos().as_secs_f64(),
            false => 0.0,
        }
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn has_ended(&self) -> bool {
        self.has_session && self.started && self.sink.empty()
    }

    fn has_session(&self) -> bool {
        self.has_session
    }

    fn state(&self) -> BackendState {
        if !self.has_session {
            BackendState::Idle
        } else if self.sink.empty() {
            BackendState::Ended
        } else if !self.started {
            BackendState::Opening
        } else if self.sink.is_paused() {
            BackendState::Paused
        } else {
            BackendState::Playing
        }
    }
}

/// Holds the output stream open on its own thread. The stream handle cannot
/// leave the thread that opened it; only the sink is handed back.
struct OutputThread {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        self.shutdown.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Audio output thread panicked");
            }
        }
    }
}

fn open_output() -> Result<(Sink, OutputThread)> {
    let (sink_tx, sink_rx) = bounded(1);
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

    let handle = thread::Builder::new()
        .name("audio-output".into())
        .spawn(move || match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                let sink = Sink::connect_new(stream.mixer());
                if sink_tx.send(Ok(sink)).is_ok() {
                    // Returns once the sender is dropped
                    let _ = shutdown_rx.recv();
                }
                debug!("Closing audio output");
            }
            Err(e) => {
                let _ = sink_tx.send(Err(e.to_string()));
            }
        })
        .map_err(|e| PlayerError::Output(e.to_string()))?;

    let output = OutputThread {
        shutdown: Some(shutdown_tx),
        handle: Some(handle),
    };

    let sink = sink_rx
        .recv()
        .map_err(|_| PlayerError::Output("audio thread exited early".into()))?
        .map_err(PlayerError::Output)?;

    Ok((sink, output))
}

fn format_hint(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();

    let hint = match ext.as_str() {
        "mp3" | "bit" | "mpga" => "mp3",
        "aac" | "adif" | "adts" => "aac",
        "m4a" | "m4b" | "m4p" | "m4r" | "mp4" => "audio/mp4",
        "ogg" | "oga" | "ogx" | "spx" => "audio/ogg",
        "flac" => "flac",
        "wav" | "wave" => "wav",
        _ => return None,
    };
    Some(hint)
}

/// New absolute position after a relative seek, kept within the episode.
fn seek_target(position: f64, delta: f64, duration: f64) -> f64 {
    let target = (position + delta).max(0.0);
    match duration > 0.0 {
        true => target.min(duration),
        false => target,
    }
}
