use super::SharedPlayer;
use crate::display::{DisplayRenderer, Frame, Marquee};
use crossbeam_channel::{Receiver, select};
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Periodic task: poll the backend, snapshot the status, draw a frame.
pub struct RenderLoop {
    shared: SharedPlayer,
    renderer: Box<dyn DisplayRenderer>,
    marquee: Marquee,
    period: Duration,
    render_failing: bool,
}

impl RenderLoop {
    pub fn new(
        shared: SharedPlayer,
        renderer: Box<dyn DisplayRenderer>,
        marquee: Marquee,
        period: Duration,
    ) -> Self {
        RenderLoop {
            shared,
            renderer,
            marquee,
            period,
            render_failing: false,
        }
    }

    pub fn spawn(mut self, shutdown: Receiver<()>) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("render".into())
            .spawn(move || self.run(shutdown))
    }

    fn run(&mut self, shutdown: Receiver<()>) {
        loop {
            self.render_once();

            select! {
                recv(shutdown) -> _ => break,
                default(self.period) => {}
            }
        }
        info!("Render loop exiting");
    }

    /// Build the next frame. The lock is held only while polling and copying.
    pub fn tick(&mut self) -> Frame {
        let status = {
            let mut player = self.shared.lock();
            player.poll_backend();
            player.take_snapshot()
        };

        let text_width = status
            .notice
            .as_deref()
            .unwrap_or(&status.title)
            .chars()
            .count();
        let offset = self
            .marquee
            .advance(text_width, self.renderer.viewport_width());

        Frame::new(status, offset)
    }

    pub fn render_once(&mut self) {
        let frame = self.tick();

        match self.renderer.render(&frame) {
            Ok(()) => self.render_failing = false,
            Err(e) if !self.render_failing => {
                warn!(error = %e, "Display render failed");
                self.render_failing = true;
            }
            Err(e) => debug!(error = %e, "Display render still failing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{
        Media, PlaybackBackend, SharedStatus, TransportState,
        fake::{Call, FakeBackend},
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Arc<Mutex<Vec<Frame>>>,
    }

    impl DisplayRenderer for Recorder {
        fn render(&mut self, frame: &Frame) -> anyhow::Result<()> {
            self.frames.lock().unwrap().push(frame.clone());
            Ok(())
        }

        fn viewport_width(&self) -> usize {
            8
        }
    }

    fn playing() -> (SharedPlayer, FakeBackend, Recorder, RenderLoop) {
        let mut backend = FakeBackend::new();
        backend.load(Media::new("https://media.test/ep.mp3", Vec::new())).unwrap();
        backend.play().unwrap();

        let mut status = SharedStatus::new("Show", 50);
        status.title = "Episode".to_string();
        status.state = TransportState::Playing;
        status.duration = 1800.0;

        let shared = SharedPlayer::new(Box::new(backend.clone()), status);
        let recorder = Recorder::default();
        let render = RenderLoop::new(
            shared.clone(),
            Box::new(recorder.clone()),
            Marquee::new(1, 4),
            Duration::from_millis(1),
        );
        (shared, backend, recorder, render)
    }

    #[test]
    fn tick_refreshes_elapsed_while_playing() {
        let (shared, backend, _recorder, mut render) = playing();
        backend.set_position(61.5);

        let frame = render.tick();
        assert_eq!(frame.elapsed, 61.5);
        assert_eq!(shared.status().elapsed, 61.5);
    }

    #[test]
    fn unknown_duration_is_filled_in_from_the_backend() {
        let (shared, backend, _recorder, mut render) = playing();
        shared.lock().status.duration = 0.0;
        backend.set_duration(600.0);

        assert_eq!(render.tick().duration, 600.0);
    }

    #[test]
    fn paused_sessions_are_not_polled() {
        let (shared, backend, _recorder, mut render) = playing();
        shared.lock().status.state = TransportState::Paused;
        backend.set_position(10.0);

        assert_eq!(render.tick().elapsed, 0.0);
    }

    #[test]
    fn end_of_media_shows_finished_once_then_stops() {
        let (shared, backend, recorder, mut render) = playing();
        backend.set_position(1799.0);
        render.render_once();
        backend.set_ended();

        render.render_once();
        render.render_once();

        let frames = recorder.frames.lock().unwrap();
        let states: Vec<_> = frames.iter().map(|f| f.state).collect();
        assert_eq!(
            states,
            vec![
                TransportState::Playing,
                TransportState::Finished,
                TransportState::Stopped
            ]
        );
        assert_eq!(frames[1].elapsed, 0.0);

        let status = shared.status();
        assert_eq!(status.state, TransportState::Stopped);
        assert_eq!(status.elapsed, 0.0);
        assert_eq!(backend.live_sessions(), 0);
        assert_eq!(backend.calls().last(), Some(&Call::Stop));
    }

    #[test]
    fn long_titles_scroll_and_short_ones_do_not() {
        let (shared, _backend, _recorder, mut render) = playing();

        let offsets: Vec<_> = (0..3).map(|_| render.tick().scroll_offset).collect();
        assert_eq!(offsets, vec![0, 0, 0]);

        shared.lock().status.title = "A much longer episode title".to_string();
        let offsets: Vec<_> = (0..3).map(|_| render.tick().scroll_offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    #[test]
    fn spawned_loop_stops_on_shutdown() {
        let (_shared, _backend, recorder, render) = playing();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let handle = render.spawn(rx).unwrap();
        thread::sleep(Duration::from_millis(10));
        tx.send(()).unwrap();
        handle.join().unwrap();

        assert!(!recorder.frames.lock().unwrap().is_empty());
    }
}
