use super::widgets::{INNER_WIDTH, PANEL_HEIGHT, PANEL_WIDTH, Panel};
use crate::display::{DisplayRenderer, Frame};
use anyhow::Result;
use ratatui::{
    DefaultTerminal,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Clear, Widget},
};

/// Draws frames into the alternate screen set up by `ratatui::init`.
pub struct TerminalDisplay {
    terminal: DefaultTerminal,
    gap: usize,
}

impl TerminalDisplay {
    pub fn new(terminal: DefaultTerminal, gap: usize) -> Self {
        TerminalDisplay { terminal, gap }
    }
}

impl DisplayRenderer for TerminalDisplay {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let clock = chrono::Local::now().format("%H:%M").to_string();
        let mut state = frame.clone();
        let gap = self.gap;

        self.terminal.draw(|f| {
            let area = panel_area(f.area());
            Clear.render(area, f.buffer_mut());
            f.render_stateful_widget(Panel { clock: &clock, gap }, area, &mut state);
        })?;
        Ok(())
    }

    fn viewport_width(&self) -> usize {
        INNER_WIDTH as usize
    }
}

fn panel_area(area: Rect) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(PANEL_HEIGHT)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(PANEL_WIDTH)])
        .flex(Flex::Center)
        .areas(area);
    area
}
