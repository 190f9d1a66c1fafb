//! Vertical slider widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};

/// A vertical track filled from the bottom up to the slider position
pub struct VerticalSlider<'a> {
    fraction: f64,
    style: Style,
    track_style: Style,
    block: Option<Block<'a>>,
}

impl<'a> VerticalSlider<'a> {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            style: Style::default(),
            track_style: Style::default(),
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn track_style(mut self, style: Style) -> Self {
        self.track_style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Rows filled for a track `height` rows tall
    fn filled_rows(&self, height: u16) -> u16 {
        (self.fraction * height as f64).round() as u16
    }

    fn render_track(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let filled = self.filled_rows(area.height);
        // three columns wide, centered
        let width = area.width.min(3);
        let x0 = area.x + (area.width - width) / 2;
        let bottom = area.y + area.height - 1;

        for row in 0..area.height {
            let y = bottom - row;
            let (symbol, style) = if row < filled {
                ("█", self.style)
            } else {
                ("│", self.track_style)
            };
            for dx in 0..width {
                let symbol = if row < filled || dx == width / 2 { symbol } else { " " };
                buf.set_string(x0 + dx, y, symbol, style);
            }
        }
    }
}

impl Widget for VerticalSlider<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        self.render_track(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Borders;

    fn render(fraction: f64, height: u16) -> Buffer {
        let area = Rect::new(0, 0, 3, height);
        let mut buf = Buffer::empty(area);
        VerticalSlider::new(fraction).render(area, &mut buf);
        buf
    }

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf[(x, y)].symbol()
    }

    #[test]
    fn test_half_filled() {
        let buf = render(0.5, 10);
        assert_eq!(symbol(&buf, 1, 9), "█");
        assert_eq!(symbol(&buf, 1, 5), "█");
        assert_eq!(symbol(&buf, 1, 4), "│");
        assert_eq!(symbol(&buf, 0, 4), " ");
    }

    #[test]
    fn test_empty_and_full() {
        let empty = render(0.0, 4);
        assert_eq!(symbol(&empty, 1, 3), "│");

        let full = render(1.0, 4);
        assert_eq!(symbol(&full, 0, 0), "█");
    }

    #[test]
    fn test_fraction_clamped() {
        assert_eq!(VerticalSlider::new(7.0).filled_rows(10), 10);
        assert_eq!(VerticalSlider::new(-1.0).filled_rows(10), 0);
    }

    #[test]
    fn test_block_wraps_track() {
        let area = Rect::new(0, 0, 5, 6);
        let mut buf = Buffer::empty(area);
        VerticalSlider::new(1.0)
            .block(Block::default().borders(Borders::ALL))
            .render(area, &mut buf);

        assert_eq!(symbol(&buf, 0, 0), "┌");
        assert_eq!(symbol(&buf, 0, 5), "└");
        // track fills the 3x4 inside only
        assert_eq!(symbol(&buf, 1, 1), "█");
        assert_eq!(symbol(&buf, 3, 4), "█");
        assert_eq!(symbol(&buf, 2, 5), "─");
    }

    #[test]
    fn test_zero_area_is_noop() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        VerticalSlider::new(0.5).render(area, &mut buf);
    }
}
