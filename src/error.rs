//! Error types for tracekit operations
//!
//! Most of the library's unwanted outcomes are *expected* and surface as a
//! `failed` trace state rather than an error value; see the state machine in
//! [`crate::trace`]. The variants here cover the remaining cases: definition
//! misuse that a caller can check ahead of time, and export failures.

use thiserror::Error;

/// Result type alias for tracekit operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// Errors that can occur in tracekit operations
#[derive(Error, Debug)]
pub enum TraceError {
    /// Trace definition declared no items to match
    ///
    /// A trace with nothing to match can never pass or fail meaningfully.
    /// Starting a run from such a definition panics with this message; use
    /// [`crate::Trace::validate`] to check first.
    #[error("trace '{name}' is invalid; cannot match against an empty list of items")]
    EmptyItemsToMatch { name: String },

    /// JSON serialization failed while exporting a report
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TraceError {
    /// Returns true if this error indicates API misuse rather than a
    /// runtime condition
    pub fn is_misuse(&self) -> bool {
        matches!(self, TraceError::EmptyItemsToMatch { .. })
    }
}
