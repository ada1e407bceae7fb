//! Contained faults flowing into the configured reporters.

use std::fs;
use std::io;
use std::sync::Arc;

use hedgerow_config::{ReporterKind, ReporterSettings};
use hedgerow_report::{
    FanoutReporter, JsonlReporter, MemoryReporter, QueuedFault, reporter_from_settings,
};
use hedgerow_tui::{Boundary, FnComponent};
use hedgerow_types::{FaultOrigin, RenderFault};
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::common::{Harness, panicker, thrower};

const AREA: Rect = Rect::new(0, 0, 60, 4);

fn read_queue(path: &std::path::Path) -> Vec<QueuedFault> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn jsonl_queue_records_cause_and_stack() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue").join("faults.jsonl");
    let reporter = JsonlReporter::open(&path).unwrap();
    let mut h = Harness::with_reporter(Arc::new(reporter));

    let mut boundary = Boundary::new(FnComponent::new(
        "SensorReadings",
        |_: Rect, _: &mut Buffer| {
            Err(RenderFault::with_cause(
                "Sensor readings unavailable",
                io::Error::other("pin 59 timed out"),
            ))
        },
    ));
    let _ = h.render(&mut boundary, AREA);
    let _ = h.render(&mut boundary, AREA);

    let queued = read_queue(&path);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].origin, FaultOrigin::Error);
    assert_eq!(queued[0].payload.message, "Sensor readings unavailable");
    assert_eq!(queued[0].component_stack, ["SensorReadings", "Boundary"]);
    assert_eq!(queued[0].cause.as_deref(), Some("pin 59 timed out"));
}

#[test]
fn jsonl_queue_marks_panics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("faults.jsonl");
    let mut h = Harness::with_reporter(Arc::new(JsonlReporter::open(&path).unwrap()));

    let mut boundary = Boundary::new(panicker("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    let queued = read_queue(&path);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].origin, FaultOrigin::Panic);
    assert_eq!(queued[0].payload.message, "ALWAYS");
    assert_eq!(queued[0].cause, None);
}

#[test]
fn settings_select_jsonl_queue() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ReporterSettings {
        kind: ReporterKind::Jsonl,
        path: dir.path().join("faults.jsonl"),
    };
    let mut h = Harness::with_reporter(reporter_from_settings(&settings));

    let mut boundary = Boundary::new(thrower("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    let queued = read_queue(&settings.path);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].payload.message, "ALWAYS");
}

#[test]
fn unopenable_queue_falls_back_without_failing_render() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending.
    let settings = ReporterSettings {
        kind: ReporterKind::Jsonl,
        path: dir.path().to_path_buf(),
    };
    let mut h = Harness::with_reporter(reporter_from_settings(&settings));

    let mut boundary = Boundary::new(thrower("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    assert!(boundary.has_fault());
    assert_eq!(h.diagnostics.entries().len(), 2);
}

#[test]
fn null_reporter_still_contains_fault() {
    let settings = ReporterSettings {
        kind: ReporterKind::None,
        path: "unused.jsonl".into(),
    };
    let mut h = Harness::with_reporter(reporter_from_settings(&settings));

    let mut boundary = Boundary::new(thrower("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    assert!(boundary.has_fault());
    assert!(!std::path::Path::new("unused.jsonl").exists());
}

#[test]
fn fanout_delivers_to_every_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("faults.jsonl");
    let memory = Arc::new(MemoryReporter::new());
    let fanout = FanoutReporter::default()
        .with(Arc::new(JsonlReporter::open(&path).unwrap()))
        .with(memory.clone());
    let mut h = Harness::with_reporter(Arc::new(fanout));

    let mut boundary = Boundary::new(thrower("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    assert_eq!(read_queue(&path).len(), 1);
    let reports = memory.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].component.as_deref(), Some("Thrower"));
}

#[test]
fn outside_reporter_is_the_only_one_wired_in() {
    let outside = Arc::new(MemoryReporter::new());
    let mut h = Harness::with_reporter(outside.clone());

    let mut boundary = Boundary::new(thrower("ALWAYS"));
    let _ = h.render(&mut boundary, AREA);

    assert!(h.reporter.is_none());
    assert_eq!(outside.len(), 1);
}
