//! Boundary lifecycle state.

use crate::FaultRecord;

/// Lifecycle phase of a fault boundary.
///
/// `Faulted` is terminal for the owning boundary instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryPhase {
    #[default]
    Ok,
    Faulted,
}

/// State owned by a single boundary.
///
/// Starts in [`BoundaryPhase::Ok`] and moves to [`BoundaryPhase::Faulted`] at
/// most once. There is no way back; a fresh boundary must be built instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryState {
    phase: BoundaryPhase,
    last_fault: Option<FaultRecord>,
}

impl BoundaryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> BoundaryPhase {
        self.phase
    }

    #[must_use]
    pub fn has_fault(&self) -> bool {
        self.phase == BoundaryPhase::Faulted
    }

    #[must_use]
    pub fn last_fault(&self) -> Option<&FaultRecord> {
        self.last_fault.as_ref()
    }

    /// Moves to `Faulted` and stores `record`.
    ///
    /// Returns `false` and leaves the state untouched if already faulted.
    pub fn record_fault(&mut self, record: FaultRecord) -> bool {
        if self.has_fault() {
            return false;
        }
        self.phase = BoundaryPhase::Faulted;
        self.last_fault = Some(record);
        true
    }
}
