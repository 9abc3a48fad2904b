/// Horizontal scroll state for text wider than the viewport.
///
/// Each call to `advance` returns the offset to draw at and then moves one
/// `step` further. The text scrolls fully out to the left and re-enters from
/// the right edge: the blank run after it is at least one viewport wide.
#[derive(Debug, Clone)]
pub struct Marquee {
    offset: usize,
    step: usize,
    gap: usize,
}

impl Marquee {
    pub fn new(step: usize, gap: usize) -> Self {
        Marquee {
            offset: 0,
            step: step.max(1),
            gap,
        }
    }

    pub fn advance(&mut self, text_width: usize, viewport: usize) -> usize {
        if text_width <= viewport {
            self.offset = 0;
            return 0;
        }

        if self.offset >= text_width + wrap_gap(self.gap, viewport) {
            self.offset = 0;
        }

        let current = self.offset;
        self.offset += self.step;
        current
    }
}

/// Blanks between the end of the text and its next repetition.
pub fn wrap_gap(gap: usize, viewport: usize) -> usize {
    gap.max(viewport)
}
