//! Config files driving reporter and theme selection.

use std::fs;

use hedgerow_config::{ConfigError, HedgerowConfig, ReporterKind};
use hedgerow_report::{MemoryDiagnostics, QueuedFault, reporter_from_settings};
use hedgerow_tui::{Boundary, FALLBACK_NOTICE, RenderContext, render_root};
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::sync::Arc;

use crate::common::{screen_text, thrower};

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn config_file_routes_faults_to_queue() {
    let dir = tempfile::tempdir().unwrap();
    let queue = dir.path().join("faults.jsonl");
    let path = write_config(
        &dir,
        &format!(
            "[reporter]\nkind = \"jsonl\"\npath = {:?}\n",
            queue.display().to_string()
        ),
    );

    let config = HedgerowConfig::load_from(&path).unwrap();
    let settings = config.reporter_settings_with(None);
    assert_eq!(settings.kind, ReporterKind::Jsonl);
    assert_eq!(settings.path, queue);

    let mut cx = RenderContext::new(
        reporter_from_settings(&settings),
        Arc::new(MemoryDiagnostics::new()),
    );
    let area = Rect::new(0, 0, 60, 4);
    let mut buf = Buffer::empty(area);
    let mut boundary = Boundary::new(thrower("ALWAYS"));
    render_root(&mut boundary, area, &mut buf, &mut cx);

    let line = fs::read_to_string(&queue).unwrap();
    let queued: QueuedFault = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(queued.payload.message, "ALWAYS");
}

#[test]
fn env_override_disables_reporting() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[reporter]\nkind = \"jsonl\"\n");

    let config = HedgerowConfig::load_from(&path).unwrap();

    assert_eq!(
        config.reporter_settings_with(Some("off")).kind,
        ReporterKind::None
    );
}

#[test]
fn ascii_only_reaches_fallback_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[app]\nascii_only = true\nhigh_contrast = true\n");
    let config = HedgerowConfig::load_from(&path).unwrap();

    let mut cx = RenderContext::default().with_options(config.ui_options());
    assert_eq!(cx.glyphs().bullet, "-");

    let area = Rect::new(0, 0, 60, 4);
    let mut buf = Buffer::empty(area);
    let mut boundary = Boundary::new(thrower("ALWAYS"));
    render_root(&mut boundary, area, &mut buf, &mut cx);

    assert!(screen_text(&buf).contains(FALLBACK_NOTICE));
}

#[test]
fn malformed_config_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[reporter\nkind = ");

    let err = HedgerowConfig::load_from(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), &path);
}
