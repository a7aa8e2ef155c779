//! Submit every `.zip` key export in a directory, two files per batch.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example submit_directory -- /path/to/keys
//! ```
//!
//! The matcher backend is picked from the default configuration: `key-matcher`
//! from PATH if present, otherwise the no-op service (which fails the
//! submission but still deletes the files).

use diagnosis_key_submit::{
    BatchSubmitter, Config, ExposureConfiguration, KeyFileBatch, SubmissionToken,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const FILES_PER_BATCH: usize = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: submit_directory <key-dir>")?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "zip"))
        .collect();
    files.sort();

    let batches: Vec<KeyFileBatch> = files
        .chunks(FILES_PER_BATCH)
        .enumerate()
        .map(|(i, chunk)| KeyFileBatch::new(i as u32 + 1, chunk.to_vec()))
        .collect();

    let submitter = BatchSubmitter::from_config(&Config::default())?;
    println!(
        "Submitting {} batch(es) to {} (timeout {:?})",
        batches.len(),
        submitter.service_name(),
        submitter.api_timeout()
    );

    match submitter
        .submit(batches, ExposureConfiguration::default(), SubmissionToken::random())
        .await
    {
        Ok(()) => println!("All batches accepted"),
        Err(e) => println!("Submission failed ({}): {}", e.error_code(), e),
    }

    Ok(())
}
