use super::{BAR_EMPTY, BAR_FILLED};
use crate::{display::Frame, readable_secs};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
};

const VOLUME_WIDTH: u16 = 5;

/// Progress bar plus the volume readout.
pub struct ProgressRow;

impl StatefulWidget for ProgressRow {
    type State = Frame;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [bar_area, volume_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(VOLUME_WIDTH)])
                .areas(area);

        let filled = state.progress_width(bar_area.width);
        let empty = bar_area.width - filled;

        Line::from_iter([
            Span::from(BAR_FILLED.repeat(filled as usize)).fg(Color::White),
            Span::from(BAR_EMPTY.repeat(empty as usize)).fg(Color::DarkGray),
        ])
        .render(bar_area, buf);

        format!("{}%", state.volume)
            .fg(Color::DarkGray)
            .into_right_aligned_line()
            .render(volume_area, buf);
    }
}

/// `MM:SS / MM:SS`
pub struct Timer;

impl StatefulWidget for Timer {
    type State = Frame;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Line::from(format!(
            "{} / {}",
            readable_secs(state.elapsed),
            readable_secs(state.duration)
        ))
        .render(area, buf);
    }
}
