//! Component tree rendering.
//!
//! Components draw into a ratatui [`Buffer`] and may fail with a
//! [`RenderFault`]. Parents render children through
//! [`RenderContext::render_child`], which keeps track of the component stack so
//! a boundary can tell which subtree failed.

use std::fmt;
use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use hedgerow_report::{LogReporter, SharedDiagnostics, SharedReporter, TracingDiagnostics};
use hedgerow_types::ui::UiOptions;
use hedgerow_types::{ComponentStack, RenderFault};

use crate::theme::{Glyphs, Palette, glyphs, palette};

/// A renderable node in the component tree.
pub trait Component {
    /// Name used in component stacks.
    fn name(&self) -> &str;

    fn render(&mut self, area: Rect, buf: &mut Buffer, cx: &mut RenderContext)
    -> Result<(), RenderFault>;
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        (**self).render(area, buf, cx)
    }
}

/// Adapts a closure into a [`Component`].
pub struct FnComponent<F> {
    name: String,
    render: F,
}

impl<F> FnComponent<F>
where
    F: FnMut(Rect, &mut Buffer) -> Result<(), RenderFault>,
{
    pub fn new(name: impl Into<String>, render: F) -> Self {
        Self {
            name: name.into(),
            render,
        }
    }
}

impl<F> Component for FnComponent<F>
where
    F: FnMut(Rect, &mut Buffer) -> Result<(), RenderFault>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        _cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        (self.render)(area, buf)
    }
}

/// Per-pass rendering state plus the process-wide collaborators boundaries
/// report to.
pub struct RenderContext {
    stack: Vec<String>,
    reporter: SharedReporter,
    diagnostics: SharedDiagnostics,
    options: UiOptions,
}

impl RenderContext {
    #[must_use]
    pub fn new(reporter: SharedReporter, diagnostics: SharedDiagnostics) -> Self {
        Self {
            stack: Vec::new(),
            reporter,
            diagnostics,
            options: UiOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        palette(self.options)
    }

    #[must_use]
    pub fn glyphs(&self) -> Glyphs {
        glyphs(self.options)
    }

    #[must_use]
    pub fn reporter(&self) -> &SharedReporter {
        &self.reporter
    }

    #[must_use]
    pub fn diagnostics(&self) -> &SharedDiagnostics {
        &self.diagnostics
    }

    /// Number of components currently being rendered.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Current component stack, innermost first.
    #[must_use]
    pub fn stack(&self) -> ComponentStack {
        ComponentStack::from_render_order(self.stack.iter().cloned())
    }

    /// Renders `child` as a descendant of the current component.
    ///
    /// A fault returned by the child is stamped with the stack as it stood
    /// inside the child, then passed up unchanged.
    pub fn render_child<C: Component + ?Sized>(
        &mut self,
        child: &mut C,
        area: Rect,
        buf: &mut Buffer,
    ) -> Result<(), RenderFault> {
        self.stack.push(child.name().to_string());
        let result = child.render(area, buf, self);
        let result = result.map_err(|mut fault| {
            fault.attach_stack(self.stack());
            fault
        });
        self.stack.pop();
        result
    }

    /// Captures the stack and drops every frame above `depth`.
    ///
    /// Used after a caught panic, which skips the pops in `render_child`.
    pub(crate) fn unwind_to(&mut self, depth: usize) -> ComponentStack {
        let stack = self.stack();
        self.stack.truncate(depth);
        stack
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Arc::new(LogReporter), Arc::new(TracingDiagnostics))
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("stack", &self.stack)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
