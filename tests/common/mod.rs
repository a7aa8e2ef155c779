//! Common test utilities for diagnosis-key-submit integration tests

use diagnosis_key_submit::CliMatchingService;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a small key file into `dir` and return its path
pub fn write_key_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"EK Export v1    ").unwrap();
    path
}

/// A matcher that runs `script` through `/bin/sh -c`
///
/// The script sees the generated matcher arguments as `$@`.
pub fn shell_matcher(script: &str) -> CliMatchingService {
    CliMatchingService::new(PathBuf::from("/bin/sh")).with_args(vec![
        "-c".to_string(),
        script.to_string(),
        "key-matcher".to_string(),
    ])
}

/// Script that appends its arguments to `log` and fails unless every `.zip`
/// argument exists
pub fn recording_script(log: &Path) -> String {
    format!(
        r#"for a in "$@"; do
  case "$a" in
    *.zip) test -f "$a" || {{ echo "missing $a" >&2; exit 9; }} ;;
  esac
done
printf '%s\n' "$@" >> '{}'"#,
        log.display()
    )
}
