use crate::display::{Frame, wrap_gap};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Stylize},
    text::Span,
    widgets::{StatefulWidget, Widget},
};

/// Episode title, or the pending notice, scrolled by the frame's offset.
pub struct Headline {
    pub gap: usize,
}

impl StatefulWidget for Headline {
    type State = Frame;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let text = scroll_window(
            state.headline(),
            state.scroll_offset,
            area.width as usize,
            self.gap,
        );

        let span = match state.notice {
            Some(_) => Span::from(text).fg(Color::LightRed),
            None => Span::from(text),
        };
        span.render(area, buf);
    }
}

/// The `width` characters visible at `offset`, treating the text as a loop
/// with at least `gap` blanks between repetitions, and never fewer than `width`.
pub fn scroll_window(text: &str, offset: usize, width: usize, gap: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }

    let gap = wrap_gap(gap, width);
    let period = len + gap;
    text.chars()
        .chain(std::iter::repeat_n(' ', gap))
        .cycle()
        .skip(offset % period)
        .take(width)
        .collect()
}
