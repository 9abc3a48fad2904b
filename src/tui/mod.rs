//! Terminal stand-in for the 128x64 OLED panel.

mod renderer;
mod widgets;

pub use renderer::TerminalDisplay;
pub use widgets::{PANEL_HEIGHT, PANEL_WIDTH, Panel};
