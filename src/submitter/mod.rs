//! Submission of downloaded key file batches to the matching service
//!
//! [`BatchSubmitter::submit`] fans a list of [`KeyFileBatch`]es out to one
//! concurrent [`MatchingService`] call each, joins them with fail-fast
//! semantics, and then deletes every submitted file whatever the outcome.
//!
//! The join is deliberately not robust to individual failures: one failed or
//! timed-out batch fails the whole submission, nothing is retried, and the
//! caller never learns which batch failed.

use crate::cleanup;
use crate::config::{Config, SubmissionConfig};
use crate::error::{Error, Result};
use crate::matching::{self, MatchingService};
use crate::types::{ExposureConfiguration, KeyFileBatch, SubmissionToken};
use futures::future::try_join_all;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};


/// Hands batches of diagnosis key files to a [`MatchingService`]
///
/// # Examples
///
/// ```no_run
/// use diagnosis_key_submit::{
///     BatchSubmitter, Config, ExposureConfiguration, KeyFileBatch, SubmissionToken,
/// };
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let submitter = BatchSubmitter::from_config(&Config::default())?;
///
/// let batches = vec![
///     KeyFileBatch::new(1, vec![PathBuf::from("/data/keys/1.zip")]),
///     KeyFileBatch::new(2, vec![PathBuf::from("/data/keys/2.zip")]),
/// ];
///
/// submitter
///     .submit(batches, ExposureConfiguration::default(), SubmissionToken::random())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BatchSubmitter {
    service: Arc<dyn MatchingService>,
    api_timeout: Duration,
}

impl BatchSubmitter {
    /// Create a submitter around an existing matching service
    pub fn new(service: Arc<dyn MatchingService>, config: &SubmissionConfig) -> Self {
        Self::with_timeout(service, config.api_timeout)
    }

    /// Create a submitter with an explicit per-call timeout
    pub fn with_timeout(service: Arc<dyn MatchingService>, api_timeout: Duration) -> Self {
        Self {
            service,
            api_timeout,
        }
    }

    /// Create a submitter whose matching backend is selected from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration fails validation.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            matching::from_config(&config.matcher),
            &config.submission,
        ))
    }

    /// Timeout applied to each matching service call
    pub fn api_timeout(&self) -> Duration {
        self.api_timeout
    }

    /// Name of the underlying matching service
    pub fn service_name(&self) -> &'static str {
        self.service.name()
    }

    /// Submit batches of key files and delete them once the submission settles
    ///
    /// One service call is spawned per batch, each bounded by the API timeout.
    /// The returned handle resolves to `Ok(())` if every call succeeded, or to
    /// the first failure observed. Once the join has settled, every file in
    /// every batch is deleted on the blocking pool before the handle resolves.
    /// Calls still in flight after a failure are detached, not cancelled.
    ///
    /// An empty `batches` resolves immediately to `Ok(())` without calling the
    /// service or touching the filesystem.
    ///
    /// Dropping the handle does not cancel the submission; the calls and the
    /// cleanup still run.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime with non-empty `batches`.
    pub fn submit(
        &self,
        batches: Vec<KeyFileBatch>,
        config: ExposureConfiguration,
        token: SubmissionToken,
    ) -> SubmissionHandle {
        if batches.is_empty() {
            debug!("no key files to provide to the matching service");
            return SubmissionHandle::ready(Ok(()));
        }

        let batch_count = batches.len();
        info!(
            batch_count,
            matching_service = self.service.name(),
            "providing diagnosis key batches to the matching service"
        );

        let config = Arc::new(config);
        let token = Arc::new(token);
        let batch_calls: Vec<JoinHandle<Result<()>>> = batches
            .iter()
            .map(|batch| {
                tokio::spawn(submit_batch(BatchCall {
                    service: self.service.clone(),
                    batch_num: batch.batch_num,
                    region: batch.region.clone(),
                    files: batch.files.clone(),
                    config: config.clone(),
                    token: token.clone(),
                    timeout: self.api_timeout,
                }))
            })
            .collect();

        let task = tokio::spawn(async move {
            let outcome = try_join_all(batch_calls.into_iter().map(|call| async move {
                call.await.unwrap_or_else(|e| Err(e.into()))
            }))
            .await
            .map(|_| ());

            match tokio::task::spawn_blocking(move || cleanup::delete_batch_files(&batches)).await
            {
                Ok(summary) => info!(
                    deleted = summary.deleted,
                    failed = summary.failed,
                    "key file cleanup complete"
                ),
                Err(e) => warn!(error = %e, "key file cleanup task failed"),
            }

            match &outcome {
                Ok(()) => info!(batch_count, "all diagnosis key batches accepted"),
                Err(e) => warn!(batch_count, error = %e, "diagnosis key submission failed"),
            }
            outcome
        });

        SubmissionHandle::pending(task)
    }
}

/// Everything a single spawned batch call needs
struct BatchCall {
    service: Arc<dyn MatchingService>,
    batch_num: u32,
    region: Option<String>,
    files: Vec<PathBuf>,
    config: Arc<ExposureConfiguration>,
    token: Arc<SubmissionToken>,
    timeout: Duration,
}

/// Provide one batch to the matching service under the per-call timeout
async fn submit_batch(call: BatchCall) -> Result<()> {
    let BatchCall {
        service,
        batch_num,
        region,
        files,
        config,
        token,
        timeout,
    } = call;

    debug!(
        batch_num,
        ?region,
        file_count = files.len(),
        "providing key batch"
    );

    let result = tokio::time::timeout(
        timeout,
        service.provide_diagnosis_keys(&files, &config, &token),
    )
    .await;

    match result {
        Ok(Ok(())) => {
            debug!(batch_num, ?region, "key batch accepted");
            Ok(())
        }
        Ok(Err(e)) => {
            warn!(batch_num, ?region, error = %e, "matching service rejected key batch");
            Err(e)
        }
        Err(_) => {
            warn!(batch_num, ?region, ?timeout, "matching service call timed out");
            Err(Error::Timeout { timeout })
        }
    }
}

/// Completion handle for a submission
///
/// Resolves to the combined outcome once every batch call has settled (or the
/// first one failed) and the submitted files have been deleted.
#[must_use = "dropping the handle detaches the submission; await it to observe the outcome"]
pub struct SubmissionHandle {
    state: HandleState,
}

enum HandleState {
    Ready(Option<Result<()>>),
    Pending(JoinHandle<Result<()>>),
}

impl SubmissionHandle {
    fn ready(outcome: Result<()>) -> Self {
        Self {
            state: HandleState::Ready(Some(outcome)),
        }
    }

    fn pending(task: JoinHandle<Result<()>>) -> Self {
        Self {
            state: HandleState::Pending(task),
        }
    }

    /// Returns true once the outcome is available without waiting
    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Pending(task) => task.is_finished(),
        }
    }
}

impl Future for SubmissionHandle {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            HandleState::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or(Ok(()))),
            HandleState::Pending(task) => Pin::new(task)
                .poll(cx)
                .map(|joined| joined.unwrap_or_else(|e| Err(e.into()))),
        }
    }
}

impl std::fmt::Debug for SubmissionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
