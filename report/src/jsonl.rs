//! Append-only JSON lines fault queue.
//!
//! Each contained fault becomes one line. An external uploader drains the file
//! and forwards entries to the error tracker.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hedgerow_types::{FaultOrigin, FaultPayload, RenderFault};

use crate::{FaultReporter, ReportError};

/// One line of the fault queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedFault {
    pub reported_at: DateTime<Utc>,
    pub origin: FaultOrigin,
    pub payload: FaultPayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl QueuedFault {
    fn from_fault(fault: &RenderFault, payload: &FaultPayload) -> Self {
        Self {
            reported_at: Utc::now(),
            origin: fault.origin(),
            payload: payload.clone(),
            component_stack: fault
                .component_stack()
                .map(|stack| stack.frames().to_vec())
                .unwrap_or_default(),
            cause: fault.cause().map(ToString::to_string),
        }
    }
}

#[derive(Debug)]
pub struct JsonlReporter {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlReporter {
    /// Opens (or creates) the queue file in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let file = options.open(&path).map_err(|source| ReportError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &QueuedFault) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(&line)?;
        file.flush()
    }
}

impl FaultReporter for JsonlReporter {
    fn report(&self, fault: &RenderFault, payload: &FaultPayload) {
        let entry = QueuedFault::from_fault(fault, payload);
        if let Err(err) = self.append(&entry) {
            tracing::warn!(path = %self.path.display(), "Failed to queue fault: {err}");
        }
    }
}
