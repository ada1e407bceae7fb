//! In-memory reporter and sink.
//!
//! Used for the on-screen fault counter and by tests that assert on exactly
//! what a boundary emitted.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

use hedgerow_types::{FaultOrigin, FaultPayload, RenderFault};

use crate::FaultReporter;
use crate::diagnostics::DiagnosticSink;

/// Snapshot of one reported fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedFault {
    pub message: String,
    pub origin: FaultOrigin,
    pub component: Option<String>,
    pub payload: FaultPayload,
}

#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<ReportedFault>>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reports(&self) -> Vec<ReportedFault> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FaultReporter for MemoryReporter {
    fn report(&self, fault: &RenderFault, payload: &FaultPayload) {
        let entry = ReportedFault {
            message: fault.message().to_string(),
            origin: fault.origin(),
            component: fault
                .component_stack()
                .and_then(|stack| stack.innermost())
                .map(str::to_string),
            payload: payload.clone(),
        };
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

/// One captured diagnostic line; `cause` is the `Debug` rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub message: String,
    pub cause: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl MemoryDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn log(&self, message: &str, cause: Option<&dyn Debug>) {
        let entry = DiagnosticEntry {
            message: message.to_string(),
            cause: cause.map(|c| format!("{c:?}")),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}
