//! Developer-facing diagnostic log sink.

use std::fmt::Debug;
use std::sync::Arc;

/// Process-wide sink for diagnostic lines.
///
/// `cause` carries the object behind the message when there is one.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, message: &str, cause: Option<&dyn Debug>);
}

pub type SharedDiagnostics = Arc<dyn DiagnosticSink>;

/// Writes diagnostics as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn log(&self, message: &str, cause: Option<&dyn Debug>) {
        match cause {
            Some(cause) => tracing::error!(cause = ?cause, "{message}"),
            None => tracing::error!("{message}"),
        }
    }
}
