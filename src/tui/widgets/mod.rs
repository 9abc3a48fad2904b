mod header;
mod headline;
mod panel;
mod progress;

pub use header::Header;
pub use headline::Headline;
pub use panel::Panel;
pub use progress::{ProgressRow, Timer};

pub const PANEL_WIDTH: u16 = 32;
pub const PANEL_HEIGHT: u16 = 8;

/// Usable columns inside the border
pub const INNER_WIDTH: u16 = PANEL_WIDTH - 2;

const PLAY_ICON: &str = "▶";
const PAUSE_ICON: &str = "❚❚";
const STOP_ICON: &str = "■";
const LOADING_ICON: &str = "⏏";
const FINISHED_ICON: &str = "✓";

const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";
