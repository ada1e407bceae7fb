//! Boundaries nested inside larger component trees.

use std::cell::Cell;
use std::rc::Rc;

use hedgerow_tui::{Boundary, Component, FnComponent, RenderContext};
use hedgerow_types::RenderFault;
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::common::{Harness, RenderFn, panicker, screen_text, static_fragment, thrower};

const AREA: Rect = Rect::new(0, 0, 80, 6);

/// Renders two children side by side.
struct Split<A, B> {
    left: A,
    right: B,
}

impl<A: Component, B: Component> Component for Split<A, B> {
    fn name(&self) -> &str {
        "Split"
    }

    fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        cx: &mut RenderContext,
    ) -> Result<(), RenderFault> {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);
        cx.render_child(&mut self.left, left, buf)?;
        cx.render_child(&mut self.right, right, buf)
    }
}

#[test]
fn inner_boundary_keeps_outer_healthy() {
    let mut h = Harness::new();
    let mut outer = Boundary::new(Split {
        left: Boundary::new(thrower("ALWAYS")),
        right: FnComponent::new("Static", static_fragment as RenderFn),
    });

    let screen = screen_text(&h.render(&mut outer, AREA));

    assert!(!outer.has_fault());
    assert!(outer.child().left.has_fault());
    assert!(screen.contains("Sorry, we can't"));
    assert!(screen.contains("<p>Hello</p>"));
    assert_eq!(h.memory().len(), 1);
}

#[test]
fn unguarded_fault_replaces_whole_outer_subtree() {
    let mut h = Harness::new();
    let mut outer = Boundary::new(Split {
        left: FnComponent::new("Static", static_fragment as RenderFn),
        right: thrower("ALWAYS"),
    });

    let screen = screen_text(&h.render(&mut outer, AREA));

    assert!(outer.has_fault());
    assert!(!screen.contains("<p>Hello</p>"));
    let record = outer.state().last_fault().expect("fault recorded");
    assert_eq!(
        record.error_context,
        "    in Thrower\n    in Split\n    in Boundary"
    );
}

#[test]
fn diagnostics_name_the_full_component_path() {
    let mut h = Harness::new();
    let mut outer = Boundary::new(Split {
        left: Boundary::new(thrower("ALWAYS")),
        right: FnComponent::new("Static", static_fragment as RenderFn),
    });

    let _ = h.render(&mut outer, AREA);

    let entries = h.diagnostics.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].message,
        "Render fault contained by boundary: ALWAYS"
    );
    assert!(entries[0].cause.is_some());
    assert_eq!(
        entries[1].message,
        "The fault above occurred in the Thrower component:\n    in Thrower\n    in Boundary\n    in Split\n    in Boundary"
    );
    assert_eq!(entries[1].cause, None);
}

#[test]
fn caught_panic_does_not_leak_frames_into_sibling_stacks() {
    let mut h = Harness::new();
    let mut outer = Boundary::new(Split {
        left: Boundary::new(panicker("sensor index out of range")),
        right: Boundary::new(thrower("ALWAYS")),
    });

    let _ = h.render(&mut outer, AREA);

    assert!(!outer.has_fault());
    let left = outer.child().left.state().last_fault().expect("left faulted");
    let right = outer.child().right.state().last_fault().expect("right faulted");
    assert_eq!(left.error_message, "sensor index out of range");
    assert_eq!(
        left.error_context,
        "    in Panicker\n    in Boundary\n    in Split\n    in Boundary"
    );
    assert_eq!(
        right.error_context,
        "    in Thrower\n    in Boundary\n    in Split\n    in Boundary"
    );
    assert_eq!(h.cx.depth(), 0);
}

#[test]
fn fresh_boundary_retries_recovered_child() {
    let mut h = Harness::new();
    let broken = Rc::new(Cell::new(true));
    let make = |broken: Rc<Cell<bool>>| {
        Boundary::new(FnComponent::new("Flaky", move |area: Rect, buf: &mut Buffer| {
            if broken.get() {
                return Err(RenderFault::new("not yet"));
            }
            static_fragment(area, buf)
        }))
    };

    let mut first = make(broken.clone());
    let _ = h.render(&mut first, AREA);
    assert!(first.has_fault());

    broken.set(false);
    let screen = screen_text(&h.render(&mut first, AREA));
    assert!(screen.contains("Sorry, we can't"));

    let mut rebuilt = make(broken);
    let screen = screen_text(&h.render(&mut rebuilt, AREA));
    assert!(!rebuilt.has_fault());
    assert!(screen.contains("<p>Hello</p>"));
    assert_eq!(h.memory().len(), 1);
}
