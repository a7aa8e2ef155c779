//! Configuration types for diagnosis-key-submit

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Default per-call timeout for the matching service
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Submission behavior configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Timeout applied to each individual matching service call (default: 10 seconds)
    ///
    /// The timeout is per call, never on the whole submission. It is stored
    /// with whole-second granularity; use
    /// [`BatchSubmitter::with_timeout`](crate::BatchSubmitter::with_timeout) for
    /// sub-second timeouts.
    #[serde(default = "default_api_timeout", with = "duration_serde")]
    pub api_timeout: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            api_timeout: default_api_timeout(),
        }
    }
}

/// Matching backend selection
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Path to an external matcher executable (auto-detected if None)
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Whether to search PATH for the matcher binary if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extra arguments passed to the matcher before the generated ones
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            search_path: true,
            extra_args: Vec::new(),
        }
    }
}

/// Main configuration for [`BatchSubmitter`](crate::BatchSubmitter)
///
/// Every field has a default, so an empty JSON object is a valid configuration.
///
/// ```
/// use diagnosis_key_submit::Config;
/// use std::time::Duration;
///
/// let config: Config = serde_json::from_str(r#"{"submission": {"api_timeout": 5}}"#).unwrap();
/// assert_eq!(config.submission.api_timeout, Duration::from_secs(5));
/// assert!(config.matcher.search_path);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Submission settings (timeouts)
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Matching backend settings
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl Config {
    /// Check the configuration for values the submitter cannot work with
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API timeout is zero or not a whole
    /// number of seconds.
    pub fn validate(&self) -> Result<()> {
        let api_timeout = self.submission.api_timeout;
        if api_timeout.is_zero() {
            return Err(Error::Config {
                message: "api_timeout must be greater than zero".into(),
                key: Some("submission.api_timeout".into()),
            });
        }
        if api_timeout.subsec_nanos() != 0 {
            return Err(Error::Config {
                message: format!(
                    "api_timeout must be a whole number of seconds, got {:?}",
                    api_timeout
                ),
                key: Some("submission.api_timeout".into()),
            });
        }
        Ok(())
    }
}

fn default_api_timeout() -> Duration {
    DEFAULT_API_TIMEOUT
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds on the wire)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
