use super::{FINISHED_ICON, LOADING_ICON, PAUSE_ICON, PLAY_ICON, STOP_ICON};
use crate::{display::Frame, player::TransportState, truncate_at_last_space};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Span,
    widgets::{StatefulWidget, Widget},
};

/// Selected feed name with the transport glyph on the right.
pub struct Header;

impl StatefulWidget for Header {
    type State = Frame;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [name_area, icon_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

        let name = truncate_at_last_space(&state.selected_name, name_area.width as usize);
        Span::from(name).bold().render(name_area, buf);

        let icon = match state.state {
            TransportState::Playing => PLAY_ICON.fg(Color::Green),
            TransportState::Paused => PAUSE_ICON.fg(Color::Yellow),
            TransportState::Stopped => STOP_ICON.fg(Color::DarkGray),
            TransportState::Loading => LOADING_ICON.fg(Color::Cyan),
            TransportState::Finished => FINISHED_ICON.fg(Color::Green),
        };
        icon.into_right_aligned_line().render(icon_area, buf);
    }
}
