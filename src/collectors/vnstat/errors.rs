//! Error types for vnstat collection
//!
//! Every collector call either yields data or one of these variants; nothing
//! is silently replaced with an empty result.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ReportError;

/// Failure while obtaining data from vnstat
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The process could not be spawned or exited with a failure status
    #[error("failed to run '{program}': {reason}")]
    ToolInvocationFailed { program: String, reason: String },

    /// vnstat ran but its output could not be understood
    #[error("malformed vnstat output: {reason}")]
    MalformedOutput { reason: String },

    /// The database directory named by vnstat's configuration is unreadable
    #[error("vnstat database directory {path} is unavailable: {source}")]
    DatabaseUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectionError {
    /// Stable machine-readable identifier used in HTTP error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionError::ToolInvocationFailed { .. } => "tool_invocation_failed",
            CollectionError::MalformedOutput { .. } => "malformed_output",
            CollectionError::DatabaseUnavailable { .. } => "database_unavailable",
        }
    }

    pub fn invocation(program: impl Into<String>, reason: impl Into<String>) -> Self {
        CollectionError::ToolInvocationFailed {
            program: program.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        CollectionError::MalformedOutput {
            reason: reason.into(),
        }
    }
}

impl From<ReportError> for CollectionError {
    fn from(err: ReportError) -> Self {
        CollectionError::malformed(err.to_string())
    }
}
