//! Error types for diagnosis-key-submit
//!
//! This module provides the error handling for the library, including:
//! - The variants a submission can fail with (timeout, service failure, missing backend)
//! - Configuration errors with the offending key
//! - Stable machine-readable error codes for callers that report failures upstream

use std::time::Duration;
use thiserror::Error;

/// Result type alias for diagnosis-key-submit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for diagnosis-key-submit
///
/// A submission collapses every per-batch failure into the first one observed,
/// so a caller only ever sees a single value of this type per submission.
#[derive(Debug, Error)]
pub enum Error {
    /// A single call to the matching service did not complete in time
    #[error("matching service call timed out after {timeout:?}")]
    Timeout {
        /// The per-call timeout that was exceeded
        timeout: Duration,
    },

    /// The matching service reported a failure for a call
    #[error("matching service error: {0}")]
    Service(String),

    /// Operation not supported (no matching backend available)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// External matcher binary could not be executed
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "submission.api_timeout")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A spawned submission task panicked or was aborted
    #[error("submission task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::TaskFailed(e.to_string())
    }
}

impl Error {
    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Timeout { .. } => "timeout",
            Error::Service(_) => "service_error",
            Error::NotSupported(_) => "not_supported",
            Error::ExternalTool(_) => "external_tool_error",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::TaskFailed(_) => "task_failed",
        }
    }

    /// Returns true if this error is a per-call timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
