//! No-op matching service used when no backend is available

use super::traits::MatchingService;
use crate::types::{ExposureConfiguration, SubmissionToken};
use async_trait::async_trait;
use std::path::PathBuf;

/// No-op matching service used when no matching backend is configured
///
/// Every call fails with `Error::NotSupported`. Submissions through it still
/// delete their key files, so nothing piles up on disk while matching is
/// unavailable.
///
/// # Examples
///
/// ```
/// use diagnosis_key_submit::{
///     ExposureConfiguration, MatchingService, NoOpMatchingService, SubmissionToken,
/// };
///
/// # #[tokio::main]
/// # async fn main() {
/// let service = NoOpMatchingService;
/// let result = service
///     .provide_diagnosis_keys(&[], &ExposureConfiguration::default(), &SubmissionToken::random())
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpMatchingService;

#[async_trait]
impl MatchingService for NoOpMatchingService {
    async fn provide_diagnosis_keys(
        &self,
        _files: &[PathBuf],
        _config: &ExposureConfiguration,
        _token: &SubmissionToken,
    ) -> crate::Result<()> {
        Err(crate::Error::NotSupported(
            "Exposure matching requires an external key-matcher binary. \
             Configure matcher.binary_path in config or ensure key-matcher is in PATH."
                .into(),
        ))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_provide_returns_not_supported() {
        let service = NoOpMatchingService;
        let result = service
            .provide_diagnosis_keys(
                &[PathBuf::from("keys.zip")],
                &ExposureConfiguration::default(),
                &SubmissionToken::new("token"),
            )
            .await;

        match result {
            Err(crate::Error::NotSupported(msg)) => {
                assert!(
                    msg.contains("binary_path") || msg.contains("PATH"),
                    "Error message should mention configuration or PATH"
                );
            }
            other => panic!("Expected NotSupported error, got: {:?}", other),
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(NoOpMatchingService.name(), "noop");
    }
}
