//! Routes panic messages into the log.
//!
//! Boundaries catch panics raised while rendering, but the default hook still
//! prints them to stderr, which would scribble over the terminal UI.

use std::env;
use std::panic::{self, PanicHookInfo};

const HEDGEROW_PANIC_STDERR: &str = "HEDGEROW_PANIC_STDERR";

pub fn install() {
    if stderr_allowed_by_override() {
        tracing::warn!(
            env_var = HEDGEROW_PANIC_STDERR,
            "Panic hook not installed; panics will print to stderr"
        );
        return;
    }

    panic::set_hook(Box::new(log_panic));
    tracing::info!("Panic hook installed");
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_default();
    tracing::error!(%location, "Panic: {message}");
}

fn stderr_allowed_by_override() -> bool {
    match env::var(HEDGEROW_PANIC_STDERR) {
        Ok(raw) => is_truthy(raw.as_str()),
        Err(_) => false,
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
