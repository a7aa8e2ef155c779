//! Core types for diagnosis-key-submit

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One logical chunk of downloaded diagnosis key files
///
/// A batch is submitted to the matching service in a single call. Once handed to
/// [`BatchSubmitter::submit`](crate::BatchSubmitter::submit), the submitter owns
/// the files and deletes them when the submission settles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFileBatch {
    /// Sequence number of this batch within its download
    pub batch_num: u32,
    /// Region the keys were published for, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Paths to the locally stored key files
    pub files: Vec<PathBuf>,
}

impl KeyFileBatch {
    /// Create a batch without a region
    pub fn new(batch_num: u32, files: Vec<PathBuf>) -> Self {
        Self {
            batch_num,
            region: None,
            files,
        }
    }

    /// Attach the region the keys belong to
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Files in this batch
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Opaque token correlating a submission with an exposure-check session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionToken(String);

impl SubmissionToken {
    /// Number of random bytes in a generated token
    const RANDOM_BYTES: usize = 16;

    /// Wrap an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generate a fresh token as lowercase hex
    pub fn random() -> Self {
        let bytes: [u8; Self::RANDOM_BYTES] = rand::thread_rng().r#gen();
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Get the token string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SubmissionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SubmissionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SubmissionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exposure risk configuration handed to the matching service
///
/// The submitter passes this through untouched; only matching backends read it.
/// Each score array holds one value (0-8) per bucket, and each weight is a
/// percentage (0-100).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureConfiguration {
    /// Minimum risk score for an exposure to be reported
    pub minimum_risk_score: u8,
    /// Scores for each attenuation bucket
    pub attenuation_scores: [u8; 8],
    /// Weight applied to the attenuation score
    pub attenuation_weight: u8,
    /// Scores for each days-since-last-exposure bucket
    pub days_since_last_exposure_scores: [u8; 8],
    /// Weight applied to the days-since-last-exposure score
    pub days_since_last_exposure_weight: u8,
    /// Scores for each exposure duration bucket
    pub duration_scores: [u8; 8],
    /// Weight applied to the duration score
    pub duration_weight: u8,
    /// Scores for each transmission risk level
    pub transmission_risk_scores: [u8; 8],
    /// Weight applied to the transmission risk score
    pub transmission_risk_weight: u8,
    /// Attenuation thresholds (dB) splitting exposure time into buckets
    pub duration_at_attenuation_thresholds: [u8; 2],
}

impl Default for ExposureConfiguration {
    fn default() -> Self {
        Self {
            minimum_risk_score: 4,
            attenuation_scores: [4; 8],
            attenuation_weight: 50,
            days_since_last_exposure_scores: [4; 8],
            days_since_last_exposure_weight: 50,
            duration_scores: [4; 8],
            duration_weight: 50,
            transmission_risk_scores: [4; 8],
            transmission_risk_weight: 50,
            duration_at_attenuation_thresholds: [50, 74],
        }
    }
}
