//! Deletion of submitted key files

use crate::types::KeyFileBatch;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Counts from one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CleanupSummary {
    /// Files removed from disk
    pub(crate) deleted: usize,
    /// Files that could not be removed (already gone, permissions, ...)
    pub(crate) failed: usize,
}

/// Remove every file referenced by the given batches
///
/// Each distinct path is removed once, even if several batches name it.
/// Errors are logged but never returned: deletion is best-effort. This does
/// blocking filesystem I/O and is meant to run on the blocking pool.
pub(crate) fn delete_batch_files(batches: &[KeyFileBatch]) -> CleanupSummary {
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut summary = CleanupSummary::default();

    for batch in batches {
        for file in batch.files() {
            if !seen.insert(file.as_path()) {
                continue;
            }
            match std::fs::remove_file(file) {
                Ok(()) => {
                    debug!(
                        batch_num = batch.batch_num,
                        region = ?batch.region,
                        ?file,
                        "deleted key file"
                    );
                    summary.deleted += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(
                        batch_num = batch.batch_num,
                        region = ?batch.region,
                        ?file,
                        "key file already gone"
                    );
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!(
                        batch_num = batch.batch_num,
                        region = ?batch.region,
                        ?file,
                        error = %e,
                        "failed to delete key file"
                    );
                    summary.failed += 1;
                }
            }
        }
    }

    summary
}
