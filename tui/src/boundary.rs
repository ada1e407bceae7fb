//! Fault-containing boundary around a component subtree.
//!
//! A [`Boundary`] renders its child into a scratch buffer. When the child
//! returns a [`RenderFault`] or panics, the scratch buffer is thrown away, the
//! fault is logged and reported once, and the boundary switches to drawing the
//! [`Fallback`] notice for the rest of its life.
//!
//! ```text
//! Ok ──(child faults)──> Faulted
//! ```
//!
//! There is no edge back to `Ok`. Owners that want to retry drop the boundary
//! and build a new one.

use std::fmt::Debug;
use std::panic::{AssertUnwindSafe, catch_unwind};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use hedgerow_types::{BoundaryPhase, BoundaryState, RenderFault};

use crate::component::{Component, RenderContext};
use crate::fallback::Fallback;

const BOUNDARY_NAME: &str = "Boundary";

pub struct Boundary<C = Box<dyn Component>> {
    child: C,
    state: BoundaryState,
}

impl<C: Component> Boundary<C> {
    pub fn new(child: C) -> Self {
        Self {
            child,
            state: BoundaryState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    #[must_use]
    pub fn has_fault(&self) -> bool {
        self.state.has_fault()
    }

    #[must_use]
    pub fn child(&self) -> &C {
        &self.child
    }

    /// Renders the child, or the fallback once faulted. Never fails.
    pub fn render_guarded(&mut self, area: Rect, buf: &mut Buffer, cx: &mut RenderContext) {
        let area = area.intersection(buf.area);

        if self.state.phase() == BoundaryPhase::Faulted {
            draw_fallback(area, buf, cx);
            return;
        }

        let mut scratch = Buffer::empty(area);
        copy_cells(buf, &mut scratch, area);

        let depth = cx.depth();
        let child = &mut self.child;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            cx.render_child(child, area, &mut scratch)
        }));

        let fault = match outcome {
            Ok(Ok(())) => {
                copy_cells(&scratch, buf, area);
                return;
            }
            Ok(Err(fault)) => fault,
            Err(payload) => {
                let mut fault = RenderFault::from_panic(payload.as_ref());
                fault.attach_stack(cx.unwind_to(depth));
                fault
            }
        };

        self.intercept(fault, cx);
        draw_fallback(area, buf, cx);
    }

    /// Logs, reports, and records a fault raised below this boundary.
    fn intercept(&mut self, fault: RenderFault, cx: &RenderContext) {
        let record = fault.record();
        let payload = fault.payload();

        let cause: &dyn Debug = &fault;
        contain("diagnostics", || {
            cx.diagnostics().log(
                &format!("Render fault contained by boundary: {}", fault.message()),
                Some(cause),
            );
        });
        contain("diagnostics", || {
            cx.diagnostics().log(
                &format!(
                    "The fault above occurred in the {} component:\n{}",
                    record_component(&fault),
                    record.error_context
                ),
                None,
            );
        });
        contain("fault reporter", || cx.reporter().report(&fault, &payload));

        self.state.record_fault(record);
    }
}

impl<C: Component> Component for Boundary<C> {
    fn name(&self) -> &str {
        BOUNDARY_NAME
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        self.render_guarded(area, buf, cx);
        Ok(())
    }
}

/// Draws a top-level boundary with a default [`RenderContext`].
impl<C: Component> Widget for &mut Boundary<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut cx = RenderContext::default();
        render_root(self, area, buf, &mut cx);
    }
}

/// Renders `boundary` as the root of a pass so it appears in component stacks.
pub fn render_root<C: Component>(
    boundary: &mut Boundary<C>,
    area: Rect,
    buf: &mut Buffer,
    cx: &mut RenderContext,
) {
    if let Err(fault) = cx.render_child(boundary, area, buf) {
        tracing::error!("Boundary returned a fault: {fault}");
    }
}

fn record_component(fault: &RenderFault) -> &str {
    fault
        .component_stack()
        .and_then(|stack| stack.innermost())
        .unwrap_or("<unknown>")
}

fn draw_fallback(area: Rect, buf: &mut Buffer, cx: &RenderContext) {
    Fallback::new(&cx.palette(), &cx.glyphs()).render(area, buf);
}

fn copy_cells(from: &Buffer, to: &mut Buffer, area: Rect) {
    for position in area.positions() {
        if let (Some(src), Some(dst)) = (from.cell(position), to.cell_mut(position)) {
            *dst = src.clone();
        }
    }
}

fn contain(collaborator: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::warn!("Boundary {collaborator} panicked while handling a fault; ignoring");
    }
}
