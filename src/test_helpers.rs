//! Shared test helpers: a scriptable matching service, key file fixtures and log capture.

use crate::matching::MatchingService;
use crate::types::{ExposureConfiguration, SubmissionToken};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// How the stub answers a call
#[derive(Clone, Debug)]
pub(crate) enum StubBehavior {
    /// Accept the batch immediately
    Succeed,
    /// Reject the batch with `Error::Service`
    Fail(&'static str),
    /// Accept the batch after sleeping
    SucceedAfter(Duration),
    /// Panic inside the call
    Panic,
}

/// One recorded call to the stub
#[derive(Clone, Debug)]
pub(crate) struct RecordedCall {
    pub(crate) files: Vec<PathBuf>,
    pub(crate) config: ExposureConfiguration,
    pub(crate) token: SubmissionToken,
    /// Whether every file still existed when the call started
    pub(crate) files_present: bool,
}

/// Matching service double with per-file behavior and call recording
pub(crate) struct StubMatchingService {
    default: StubBehavior,
    overrides: Vec<(PathBuf, StubBehavior)>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubMatchingService {
    pub(crate) fn new(default: StubBehavior) -> Self {
        Self {
            default,
            overrides: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Use `behavior` for any batch containing `file`
    pub(crate) fn on_file(mut self, file: &Path, behavior: StubBehavior) -> Self {
        self.overrides.push((file.to_path_buf(), behavior));
        self
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn behavior_for(&self, files: &[PathBuf]) -> StubBehavior {
        self.overrides
            .iter()
            .find(|(file, _)| files.contains(file))
            .map(|(_, behavior)| behavior.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl MatchingService for StubMatchingService {
    async fn provide_diagnosis_keys(
        &self,
        files: &[PathBuf],
        config: &ExposureConfiguration,
        token: &SubmissionToken,
    ) -> crate::Result<()> {
        self.calls.lock().unwrap().push(RecordedCall {
            files: files.to_vec(),
            config: config.clone(),
            token: token.clone(),
            files_present: files.iter().all(|f| f.exists()),
        });

        match self.behavior_for(files) {
            StubBehavior::Succeed => Ok(()),
            StubBehavior::Fail(msg) => Err(crate::Error::Service(msg.to_string())),
            StubBehavior::SucceedAfter(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            StubBehavior::Panic => panic!("stub matching service panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Write a small key file into `dir` and return its path
pub(crate) fn write_key_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"EK Export v1    ").unwrap();
    path
}

/// In-memory sink for formatted `tracing` output
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// A plain-text subscriber at DEBUG level writing into this capture
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let capture = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || capture.clone())
            .finish()
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
