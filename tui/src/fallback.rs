//! Fixed notice drawn in place of a faulted subtree.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::theme::{Glyphs, Palette, styles};

pub const FALLBACK_NOTICE: &str = "Sorry, we can't render this part of the page.";

const FALLBACK_TITLE: &str = " Unavailable ";

/// Draws [`FALLBACK_NOTICE`]. Knows nothing about the fault it replaces.
#[derive(Debug, Clone, Copy)]
pub struct Fallback {
    border: BorderType,
    border_style: Style,
    text_style: Style,
}

impl Fallback {
    #[must_use]
    pub fn new(palette: &Palette, glyphs: &Glyphs) -> Self {
        Self {
            border: glyphs.border,
            border_style: styles::fallback_border(palette),
            text_style: styles::fallback_text(palette),
        }
    }
}

impl Widget for Fallback {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        Paragraph::new(Line::from(FALLBACK_NOTICE))
            .style(self.text_style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(self.border)
                    .border_style(self.border_style)
                    .title(FALLBACK_TITLE),
            )
            .render(area, buf);
    }
}
