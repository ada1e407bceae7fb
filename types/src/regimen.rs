//! Regimen records and copy naming.
//!
//! Copies get a `"<name> copy <n>"` name. The counter that disambiguates them is
//! owned by the caller and passed in explicitly.

use serde::{Deserialize, Serialize};

use crate::NonEmptyString;

/// One scheduled sequence run inside a regimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimenItem {
    pub sequence: NonEmptyString,
    /// Offset from the regimen start, in milliseconds.
    pub time_offset_ms: u64,
}

/// A named schedule of sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regimen {
    pub name: NonEmptyString,
    pub color: String,
    pub items: Vec<RegimenItem>,
}

impl Regimen {
    #[must_use]
    pub fn new(name: NonEmptyString) -> Self {
        Self {
            name,
            color: "gray".to_string(),
            items: Vec::new(),
        }
    }

    /// Duplicates this regimen under a fresh name drawn from `counter`.
    #[must_use]
    pub fn copy_with(&self, counter: &mut CopyCounter) -> Self {
        let suffix = format!(" copy {}", counter.next_suffix());
        Self {
            name: self.name.clone().append(suffix),
            color: self.color.clone(),
            items: self.items.clone(),
        }
    }
}

/// Monotonic counter used to keep copy names distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyCounter {
    next: u32,
}

impl CopyCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next suffix, starting at 1.
    pub fn next_suffix(&mut self) -> u32 {
        self.next = self.next.saturating_add(1);
        self.next
    }
}
