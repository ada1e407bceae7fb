//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;

use hedgerow_report::{MemoryDiagnostics, MemoryReporter, SharedReporter};
use hedgerow_tui::{Boundary, Component, FnComponent, RenderContext, render_root};
use hedgerow_types::RenderFault;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

pub type RenderFn = fn(Rect, &mut Buffer) -> Result<(), RenderFault>;

/// Render context wired to in-memory collaborators.
///
/// `reporter` is `None` when the harness was built around an outside reporter.
pub struct Harness {
    pub reporter: Option<Arc<MemoryReporter>>,
    pub diagnostics: Arc<MemoryDiagnostics>,
    pub cx: RenderContext,
}

impl Harness {
    pub fn new() -> Self {
        let reporter = Arc::new(MemoryReporter::new());
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let cx = RenderContext::new(reporter.clone(), diagnostics.clone());
        Self {
            reporter: Some(reporter),
            diagnostics,
            cx,
        }
    }

    /// Uses `reporter` in place of the in-memory one.
    pub fn with_reporter(reporter: SharedReporter) -> Self {
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let cx = RenderContext::new(reporter, diagnostics.clone());
        Self {
            reporter: None,
            diagnostics,
            cx,
        }
    }

    /// The in-memory reporter wired into `cx`.
    pub fn memory(&self) -> &MemoryReporter {
        self.reporter
            .as_deref()
            .expect("harness was built with an outside reporter")
    }

    pub fn render<C: Component>(&mut self, boundary: &mut Boundary<C>, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        render_root(boundary, area, &mut buf, &mut self.cx);
        buf
    }
}

pub fn screen_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

pub fn thrower(message: &'static str) -> FnComponent<impl FnMut(Rect, &mut Buffer) -> Result<(), RenderFault>> {
    FnComponent::new("Thrower", move |_, _| Err(RenderFault::new(message)))
}

pub fn panicker(message: &'static str) -> FnComponent<impl FnMut(Rect, &mut Buffer) -> Result<(), RenderFault>> {
    FnComponent::new("Panicker", move |_, _| panic!("{message}"))
}

pub fn static_fragment(area: Rect, buf: &mut Buffer) -> Result<(), RenderFault> {
    buf.set_string(area.x, area.y, "<p>Hello</p>", Style::default());
    Ok(())
}
