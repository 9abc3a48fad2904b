mod marquee;

pub use marquee::{Marquee, wrap_gap};

use crate::player::{SharedStatus, TransportState};

/// Everything one panel refresh needs, copied out of the shared status.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub selected_name: String,
    pub title: String,
    pub state: TransportState,
    pub volume: u8,
    pub elapsed: f64,
    pub duration: f64,
    pub notice: Option<String>,
    pub scroll_offset: usize,
}

impl Frame {
    pub fn new(status: SharedStatus, scroll_offset: usize) -> Self {
        Frame {
            selected_name: status.selected_name,
            title: status.title,
            state: status.state,
            volume: status.volume,
            elapsed: status.elapsed,
            duration: status.duration,
            notice: status.notice,
            scroll_offset,
        }
    }

    /// Text for the title row: a pending notice wins over the episode title
    pub fn headline(&self) -> &str {
        self.notice.as_deref().unwrap_or(&self.title)
    }

    pub fn progress_width(&self, bar_width: u16) -> u16 {
        progress_width(self.elapsed, self.duration, bar_width)
    }
}

/// Draws frames to the physical (or emulated) panel. Called from the render
/// loop, outside the status lock.
pub trait DisplayRenderer: Send {
    fn render(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Width of the title row, in the units the marquee scrolls by
    fn viewport_width(&self) -> usize;
}

/// Filled length of a progress bar, `floor(elapsed / duration * width)`.
/// Zero while the duration is unknown.
pub fn progress_width(elapsed: f64, duration: f64, bar_width: u16) -> u16 {
    if duration.is_nan() || duration <= 0.0 || !elapsed.is_finite() {
        return 0;
    }

    let filled = (elapsed / duration * f64::from(bar_width)).floor();
    filled.clamp(0.0, f64::from(bar_width)) as u16
}
