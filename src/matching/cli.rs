//! CLI-based matching service using an external matcher binary

use super::traits::MatchingService;
use crate::types::{ExposureConfiguration, SubmissionToken};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Name of the matcher binary searched for in PATH
pub const DEFAULT_MATCHER_BINARY: &str = "key-matcher";

/// Matching service that runs an external matcher binary once per batch
///
/// Each call runs:
///
/// ```text
/// <binary> [extra_args...] --token <token> --config <json> -- <file>...
/// ```
///
/// where `<json>` is the camelCase [`ExposureConfiguration`]. Exit code 0 means
/// the batch was accepted. The child is killed if the call is dropped, which is
/// what happens when the submitter's per-call timeout fires.
///
/// # Examples
///
/// ```no_run
/// use diagnosis_key_submit::matching::CliMatchingService;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let service = CliMatchingService::new(PathBuf::from("/usr/local/bin/key-matcher"));
///
/// // Or auto-discover from PATH
/// let service = CliMatchingService::from_path()
///     .expect("key-matcher not found in PATH");
/// ```
pub struct CliMatchingService {
    binary_path: PathBuf,
    extra_args: Vec<String>,
}

impl CliMatchingService {
    /// Create a new CLI service with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            extra_args: Vec::new(),
        }
    }

    /// Attempt to find the matcher binary in PATH
    ///
    /// Uses the `which` crate to search for [`DEFAULT_MATCHER_BINARY`].
    pub fn from_path() -> Option<Self> {
        which::which(DEFAULT_MATCHER_BINARY).ok().map(Self::new)
    }

    /// Arguments placed before the generated ones on every invocation
    pub fn with_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Path of the binary this service executes
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }
}

#[async_trait]
impl MatchingService for CliMatchingService {
    async fn provide_diagnosis_keys(
        &self,
        files: &[PathBuf],
        config: &ExposureConfiguration,
        token: &SubmissionToken,
    ) -> crate::Result<()> {
        let config_json = serde_json::to_string(config)?;

        let output = Command::new(&self.binary_path)
            .args(&self.extra_args)
            .arg("--token")
            .arg(token.as_str())
            .arg("--config")
            .arg(&config_json)
            .arg("--")
            .args(files)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                crate::Error::ExternalTool(format!(
                    "Failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        if output.status.success() {
            tracing::debug!(
                binary = ?self.binary_path,
                file_count = files.len(),
                "matcher accepted key files"
            );
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = match output.status.code() {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        };
        Err(crate::Error::Service(format!(
            "{} failed with {}: {}",
            self.binary_path.display(),
            status,
            stderr.trim()
        )))
    }

    fn name(&self) -> &'static str {
        "cli-matcher"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_consistency_with_which_crate() {
        // from_path() must agree with which::which() on whether the binary exists
        let which_result = which::which(DEFAULT_MATCHER_BINARY);
        let from_path_result = CliMatchingService::from_path();

        assert_eq!(
            which_result.is_ok(),
            from_path_result.is_some(),
            "from_path() should return Some if and only if which::which() succeeds"
        );
        if let (Ok(expected), Some(service)) = (which_result, from_path_result) {
            assert_eq!(service.binary_path(), &expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_binary_path_is_external_tool_error() {
        let service = CliMatchingService::new(PathBuf::from("/nonexistent/path/to/key-matcher"));

        let result = service
            .provide_diagnosis_keys(
                &[PathBuf::from("keys.zip")],
                &ExposureConfiguration::default(),
                &SubmissionToken::new("token"),
            )
            .await;

        match result {
            Err(crate::Error::ExternalTool(msg)) => {
                assert!(msg.contains("Failed to execute"));
                assert!(msg.contains("key-matcher"));
            }
            other => panic!("Expected ExternalTool error, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_service_error() {
        let service = CliMatchingService::new(PathBuf::from("/bin/sh")).with_args(vec![
            "-c".into(),
            "echo 'bad key file' >&2; exit 3".into(),
            "key-matcher".into(),
        ]);

        let result = service
            .provide_diagnosis_keys(
                &[PathBuf::from("keys.zip")],
                &ExposureConfiguration::default(),
                &SubmissionToken::new("token"),
            )
            .await;

        match result {
            Err(crate::Error::Service(msg)) => {
                assert!(msg.contains("exit code 3"), "message was: {}", msg);
                assert!(msg.contains("bad key file"), "message was: {}", msg);
            }
            other => panic!("Expected Service error, got: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let service = CliMatchingService::new(PathBuf::from("/bin/sh"))
            .with_args(vec!["-c".into(), "exit 0".into(), "key-matcher".into()]);

        let result = service
            .provide_diagnosis_keys(
                &[PathBuf::from("keys.zip")],
                &ExposureConfiguration::default(),
                &SubmissionToken::new("token"),
            )
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_name() {
        assert_eq!(CliMatchingService::new(PathBuf::from("x")).name(), "cli-matcher");
    }
}
