use super::{Header, Headline, ProgressRow, Timer};
use crate::display::Frame;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    widgets::{Block, BorderType, StatefulWidget, Widget},
};

/// The whole panel: six rows inside a border.
pub struct Panel<'a> {
    pub clock: &'a str,
    pub gap: usize,
}

impl StatefulWidget for Panel<'_> {
    type State = Frame;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .fg(Color::DarkGray);
        let inner = block.inner(area);
        block.render(area, buf);

        let [header, headline, progress, timer, _, clock] =
            Layout::vertical([Constraint::Length(1); 6]).areas(inner);

        Header.render(header, buf, state);
        Headline { gap: self.gap }.render(headline, buf, state);
        ProgressRow.render(progress, buf, state);
        Timer.render(timer, buf, state);

        self.clock
            .fg(Color::DarkGray)
            .into_right_aligned_line()
            .render(clock, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        player::{SharedStatus, TransportState},
        tui::widgets::{PANEL_HEIGHT, PANEL_WIDTH},
    };

    fn draw(frame: &Frame) -> Vec<String> {
        let area = Rect::new(0, 0, PANEL_WIDTH, PANEL_HEIGHT);
        let mut buf = Buffer::empty(area);
        let mut state = frame.clone();
        Panel {
            clock: "09:41",
            gap: 4,
        }
        .render(area, &mut buf, &mut state);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn playing() -> Frame {
        let mut status = SharedStatus::new("Radiolab", 65);
        status.title = "Episode".into();
        status.state = TransportState::Playing;
        status.elapsed = 90.0;
        status.duration = 180.0;
        Frame::new(status, 0)
    }

    #[test]
    fn rows_show_status() {
        let rows = draw(&playing());

        assert!(rows[1].contains("Radiolab"));
        assert!(rows[1].contains("▶"));
        assert!(rows[2].contains("Episode"));
        assert!(rows[3].contains("65%"));
        assert!(rows[4].contains("01:30 / 03:00"));
        assert!(rows[6].contains("09:41"));
    }

    #[test]
    fn bar_is_half_full_at_half_time() {
        let rows = draw(&playing());
        // 25 bar cells after the volume readout, floor(12.5)
        assert_eq!(rows[3].matches('█').count(), 12);
        assert_eq!(rows[3].matches('░').count(), 13);
    }

    #[test]
    fn notice_replaces_title() {
        let mut frame = playing();
        frame.state = TransportState::Stopped;
        frame.notice = Some("No episode".into());
        let rows = draw(&frame);

        assert!(rows[1].contains("■"));
        assert!(rows[2].contains("No episode"));
        assert!(!rows[2].contains("Episode"));
    }
}
