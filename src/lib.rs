//! # diagnosis-key-submit
//!
//! Hands downloaded diagnosis key files to an exposure-matching service and
//! deletes them afterward.
//!
//! ## Design Philosophy
//!
//! diagnosis-key-submit is designed to be:
//! - **Thin** - One fan-out, one join, one cleanup; no retries and no partial results
//! - **Backend-agnostic** - The matching service is a trait, so a platform API,
//!   an external binary or a test double can sit behind it
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use diagnosis_key_submit::{
//!     BatchSubmitter, CliMatchingService, ExposureConfiguration, KeyFileBatch,
//!     SubmissionConfig, SubmissionToken,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = Arc::new(CliMatchingService::new(PathBuf::from("/usr/local/bin/key-matcher")));
//!     let submitter = BatchSubmitter::new(service, &SubmissionConfig::default());
//!
//!     let batches = vec![KeyFileBatch::new(1, vec![PathBuf::from("/data/keys/1.zip")])];
//!
//!     // Files are deleted once the submission settles, whatever the outcome
//!     submitter
//!         .submit(batches, ExposureConfiguration::default(), SubmissionToken::random())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Deletion of submitted key files
mod cleanup;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Exposure matching backends
pub mod matching;
/// Batch submission
pub mod submitter;
/// Core types
pub mod types;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, MatcherConfig, SubmissionConfig};
pub use error::{Error, Result};
pub use matching::{CliMatchingService, MatchingService, NoOpMatchingService};
pub use submitter::{BatchSubmitter, SubmissionHandle};
pub use types::{ExposureConfiguration, KeyFileBatch, SubmissionToken};
