//! Fault reporting for Hedgerow boundaries.
//!
//! Boundaries call two collaborators when they contain a fault:
//!
//! - a [`DiagnosticSink`] for developer-visible log lines, and
//! - a [`FaultReporter`] that forwards the fault for remote triage.
//!
//! Both are fire-and-forget. Implementations swallow their own failures; a
//! reporter that cannot write logs a warning and moves on.

mod diagnostics;
mod jsonl;
mod memory;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;

use hedgerow_config::{ReporterKind, ReporterSettings};
use hedgerow_types::{FaultPayload, RenderFault};
use thiserror::Error;

pub use diagnostics::{DiagnosticSink, SharedDiagnostics, TracingDiagnostics};
pub use jsonl::{JsonlReporter, QueuedFault};
pub use memory::{DiagnosticEntry, MemoryDiagnostics, MemoryReporter, ReportedFault};

/// Receives contained faults for forwarding to an error tracker.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: &RenderFault, payload: &FaultPayload);
}

/// Reporter handle shared by every boundary in the process.
pub type SharedReporter = Arc<dyn FaultReporter>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to prepare fault queue directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open fault queue {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Emits each fault as a `tracing` error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl FaultReporter for LogReporter {
    fn report(&self, fault: &RenderFault, payload: &FaultPayload) {
        let component = fault
            .component_stack()
            .and_then(|stack| stack.innermost())
            .unwrap_or("<unknown>");
        tracing::error!(
            fault = %payload.message,
            origin = ?fault.origin(),
            component,
            "Render fault reported"
        );
    }
}

/// Drops every fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl FaultReporter for NullReporter {
    fn report(&self, _fault: &RenderFault, _payload: &FaultPayload) {}
}

/// Forwards each fault to every inner reporter in order.
///
/// A target that panics is skipped; the rest still receive the fault.
#[derive(Default, Clone)]
pub struct FanoutReporter {
    targets: Vec<SharedReporter>,
}

impl FanoutReporter {
    #[must_use]
    pub fn new(targets: Vec<SharedReporter>) -> Self {
        Self { targets }
    }

    #[must_use]
    pub fn with(mut self, target: SharedReporter) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FaultReporter for FanoutReporter {
    fn report(&self, fault: &RenderFault, payload: &FaultPayload) {
        for (idx, target) in self.targets.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| target.report(fault, payload))).is_err() {
                tracing::warn!(index = idx, "Fault reporter panicked; continuing with the rest");
            }
        }
    }
}

/// Builds the reporter selected by config.
///
/// A `jsonl` reporter whose queue cannot be opened degrades to [`LogReporter`].
#[must_use]
pub fn reporter_from_settings(settings: &ReporterSettings) -> SharedReporter {
    match settings.kind {
        ReporterKind::Log => Arc::new(LogReporter),
        ReporterKind::None => Arc::new(NullReporter),
        ReporterKind::Jsonl => match JsonlReporter::open(&settings.path) {
            Ok(reporter) => {
                tracing::info!(path = %settings.path.display(), "Fault queue opened");
                Arc::new(reporter)
            }
            Err(err) => {
                tracing::warn!("{err}; falling back to log reporter");
                Arc::new(LogReporter)
            }
        },
    }
}
