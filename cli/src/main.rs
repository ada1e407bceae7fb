//! Hedgerow CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI wires [`hedgerow_config`] (settings), [`hedgerow_report`] (fault
//! reporters), and [`hedgerow_tui`] (boundaries and panels) into one control
//! panel screen, with RAII-based terminal management and guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new(mode) -> run_app() -> ControlPanel::render()
//!                                                          |
//!                                                          v
//!                                          Boundary per panel -> Fallback on fault
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain pending key events without blocking
//! 3. Render frame
//! 4. Check for quit

mod app;
mod panels;
mod panic_hook;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{TerminalOptions, Viewport, prelude::*};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hedgerow_config::HedgerowConfig;
use hedgerow_report::reporter_from_settings;

use crate::app::ControlPanel;

const INLINE_VIEWPORT_HEIGHT: u16 = 14;
const TUI_ENV: &str = "HEDGEROW_TUI";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: drop logs rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.hedgerow/logs/hedgerow.log
    if let Some(config_dir) = hedgerow_config::config_dir() {
        candidates.push(config_dir.join("logs").join("hedgerow.log"));
    }

    // Fallback: ./.hedgerow/logs/hedgerow.log
    candidates.push(PathBuf::from(".hedgerow").join("logs").join("hedgerow.log"));

    candidates
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiMode {
    Full,
    Inline,
}

impl UiMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(UiMode::Inline),
            "full" | "fullscreen" => Some(UiMode::Full),
            _ => None,
        }
    }

    fn from_config(config: Option<&HedgerowConfig>) -> Option<Self> {
        let raw = config.and_then(HedgerowConfig::tui_mode)?;
        let mode = Self::parse(raw);
        if mode.is_none() {
            tracing::warn!("Unknown tui mode in config: {raw}");
        }
        mode
    }

    /// `HEDGEROW_TUI` wins over `[app].tui`; full-screen when neither is set.
    fn resolve(env_value: Option<&str>, config: Option<&HedgerowConfig>) -> Self {
        let from_env = env_value.and_then(|raw| {
            let mode = Self::parse(raw);
            if mode.is_none() {
                tracing::warn!("Unknown tui mode in {TUI_ENV}: {raw}");
            }
            mode
        });
        from_env
            .or_else(|| Self::from_config(config))
            .unwrap_or(UiMode::Full)
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode is always enabled; full mode also enters the alternate screen.
/// On drop the terminal is restored, even after an early return.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    use_alternate_screen: bool,
}

impl TerminalSession {
    fn new(mode: UiMode) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;

        let mut out = stdout();
        let use_alternate_screen = matches!(mode, UiMode::Full);
        if use_alternate_screen && let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter alternate screen");
        }

        let backend = CrosstermBackend::new(out);
        let terminal = match mode {
            UiMode::Full => Terminal::new(backend),
            UiMode::Inline => Terminal::with_options(
                backend,
                TerminalOptions {
                    viewport: Viewport::Inline(INLINE_VIEWPORT_HEIGHT),
                },
            ),
        };
        let terminal = match terminal {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                if use_alternate_screen {
                    let _ = execute!(stdout(), LeaveAlternateScreen);
                }
                return Err(err).context("failed to initialize terminal");
            }
        };

        Ok(Self {
            terminal,
            use_alternate_screen,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        if self.use_alternate_screen {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        } else {
            let _ = self.terminal.clear();
        }
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    panic_hook::install();

    let config = match HedgerowConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring config: {err}");
            None
        }
    };
    let ui_mode = UiMode::resolve(env::var(TUI_ENV).ok().as_deref(), config.as_ref());
    let config = config.unwrap_or_default();

    let reporter = reporter_from_settings(&config.reporter_settings());
    let mut panel = ControlPanel::new(reporter, config.ui_options());

    let mut session = TerminalSession::new(ui_mode)?;
    let result = run_app(&mut session.terminal, &mut panel).await;
    drop(session);

    if let Err(err) = &result {
        tracing::error!("Exiting with error: {err:?}");
    }
    tracing::info!(
        faults = panel.reported_faults(),
        "Session ended"
    );
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, panel: &mut ControlPanel) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                panel.handle_key(key);
            }
        }
        if panel.should_quit() {
            return Ok(());
        }

        terminal.draw(|frame| {
            let area = frame.area();
            panel.render(area, frame.buffer_mut());
        })?;
    }
}
