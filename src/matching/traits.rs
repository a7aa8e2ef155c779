//! Trait for exposure matching backends

use crate::types::{ExposureConfiguration, SubmissionToken};
use async_trait::async_trait;
use std::path::PathBuf;

/// Trait for the exposure-matching service that ingests diagnosis key files
///
/// The submitter calls [`provide_diagnosis_keys`](Self::provide_diagnosis_keys)
/// once per batch, concurrently, and wraps each call in its own timeout.
/// Implementations can drive an external binary, talk to a platform service,
/// or stand in for one in tests.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use diagnosis_key_submit::{ExposureConfiguration, MatchingService, SubmissionToken};
/// use std::path::PathBuf;
///
/// struct AcceptAll;
///
/// #[async_trait]
/// impl MatchingService for AcceptAll {
///     async fn provide_diagnosis_keys(
///         &self,
///         _files: &[PathBuf],
///         _config: &ExposureConfiguration,
///         _token: &SubmissionToken,
///     ) -> diagnosis_key_submit::Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "accept-all"
///     }
/// }
/// ```
#[async_trait]
pub trait MatchingService: Send + Sync {
    /// Hand one batch of key files to the matching service
    ///
    /// # Arguments
    ///
    /// * `files` - Paths of the key files in the batch
    /// * `config` - Exposure configuration, passed through unchanged
    /// * `token` - Token correlating this call with a submission session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service rejects the files ([`Error::Service`](crate::Error::Service))
    /// - The backend cannot be reached or executed
    /// - No backend is available (for stub implementations)
    async fn provide_diagnosis_keys(
        &self,
        files: &[PathBuf],
        config: &ExposureConfiguration,
        token: &SubmissionToken,
    ) -> crate::Result<()>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
