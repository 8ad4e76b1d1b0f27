//! Error types for helper-core operations.
//! Element absence is never an error; locators return `Ok(None)` for that.

use std::path::PathBuf;
use std::time::Duration;

use crate::types::Target;

// ═══════════════════════════════════════════════════════════════════════════════
// Host Document Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Faults raised by the host document while a reconciler or click behavior
/// talks to it.
///
/// The dispatcher isolates these per reconciler: a fault in one never stops
/// its siblings from running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Element for {target} has an unexpected shape: {details}")]
    MalformedElement { target: Target, details: String },

    #[error("Element for {target} is no longer attached to the document")]
    Detached { target: Target },

    #[error("Host rejected {operation}: {details}")]
    Rejected {
        operation: &'static str,
        details: String,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Bounded Wait Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure of a bounded wait. Callers can tell a deadline apart from a
/// conversation that closed underneath them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    #[error("Timed out waiting for condition after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("Wait aborted: conversation closed (generation {started} -> {current})")]
    Aborted { started: u64, current: u64 },
}

impl WaitError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, WaitError::Aborted { .. })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Crate Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from configuration loading and file-backed helpers.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using HelperError.
pub type Result<T> = std::result::Result<T, HelperError>;

impl From<HelperError> for String {
    fn from(err: HelperError) -> String {
        err.to_string()
    }
}
