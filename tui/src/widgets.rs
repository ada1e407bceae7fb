//! Presentational components: titled panels, headers, and setting rows.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use hedgerow_types::RenderFault;

use crate::component::{Component, RenderContext};
use crate::theme::styles;

/// Bordered, titled container around one child.
pub struct Panel<C> {
    title: String,
    child: C,
}

impl<C: Component> Panel<C> {
    pub fn new(title: impl Into<String>, child: C) -> Self {
        Self {
            title: title.into(),
            child,
        }
    }
}

impl<C: Component> Component for Panel<C> {
    fn name(&self) -> &str {
        "Panel"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        let palette = cx.palette();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(cx.glyphs().border)
            .border_style(styles::panel_border(&palette))
            .title(Span::styled(
                format!(" {} ", self.title),
                styles::panel_title(&palette),
            ));
        let inner = block.inner(area);
        block.render(area, buf);
        cx.render_child(&mut self.child, inner, buf)
    }
}

/// Value shown on the right of a [`SettingRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    Text(String),
    Toggle(bool),
}

impl RowValue {
    fn display(&self) -> String {
        match self {
            RowValue::Text(text) => text.clone(),
            RowValue::Toggle(true) => "[ ON  ]".to_string(),
            RowValue::Toggle(false) => "[ OFF ]".to_string(),
        }
    }
}

/// One `label ... value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRow {
    pub label: String,
    pub value: RowValue,
}

impl SettingRow {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: RowValue::Text(value.into()),
        }
    }

    pub fn toggle(label: impl Into<String>, on: bool) -> Self {
        Self {
            label: label.into(),
            value: RowValue::Toggle(on),
        }
    }
}

impl Component for SettingRow {
    fn name(&self) -> &str {
        "SettingRow"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        if area.is_empty() {
            return Ok(());
        }
        let palette = cx.palette();
        let width = usize::from(area.width);
        let value = fit_width(&self.value.display(), width / 2);
        let label_width = width.saturating_sub(value.width() + 1);
        let label = fit_width(&self.label, label_width);
        let gap = width.saturating_sub(label.width() + value.width());

        let line = Line::from(vec![
            Span::styled(label, styles::row_label(&palette)),
            Span::raw(" ".repeat(gap)),
            Span::styled(value, styles::row_value(&palette)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
        Ok(())
    }
}

/// Header line followed by one row per setting.
pub struct SettingsList {
    header: String,
    rows: Vec<SettingRow>,
}

impl SettingsList {
    pub fn new(header: impl Into<String>, rows: Vec<SettingRow>) -> Self {
        Self {
            header: header.into(),
            rows,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[SettingRow] {
        &self.rows
    }
}

impl Component for SettingsList {
    fn name(&self) -> &str {
        "SettingsList"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        if area.is_empty() {
            return Ok(());
        }
        let palette = cx.palette();
        let header = Line::from(Span::styled(
            fit_width(&self.header, usize::from(area.width)),
            styles::header(&palette),
        ));
        buf.set_line(area.x, area.y, &header, area.width);

        for (idx, row) in self.rows.iter_mut().enumerate() {
            let offset = u16::try_from(idx + 1).unwrap_or(u16::MAX);
            if offset >= area.height {
                break;
            }
            let row_area = Rect::new(area.x, area.y + offset, area.width, 1);
            cx.render_child(row, row_area, buf)?;
        }
        Ok(())
    }
}

/// Truncates `text` to at most `max` display columns, adding `…` when cut.
#[must_use]
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
