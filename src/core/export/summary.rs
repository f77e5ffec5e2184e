//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results,
//! and the writer for the per-run copy error log shipped inside the archive.

use crate::core::export::private_files::CopyReport;
use crate::domain::{RejectedPath, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Name of the copy error log inside the content directory
pub const ERROR_LOG_FILE: &str = "privateFileErrors.txt";

/// A copy that did not make it into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    /// Content-relative path of the missing file
    pub path: PathBuf,

    /// Why the copy failed
    pub message: String,
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Course that was exported
    pub course_id: i64,

    /// Number of definition files written
    pub def_files_written: usize,

    /// Distinct private problem files requested
    pub problem_files: usize,

    /// Distinct assets discovered inside problem files
    pub assets: usize,

    /// Files that made it into the staging tree
    pub files_copied: usize,

    /// Empty references, skipped without a failure
    pub skipped_references: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Copies that failed, in settle order
    pub failures: Vec<CopyFailure>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(course_id: i64) -> Self {
        Self {
            course_id,
            def_files_written: 0,
            problem_files: 0,
            assets: 0,
            files_copied: 0,
            skipped_references: 0,
            duration: Duration::from_secs(0),
            failures: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold the outcomes of a copy run into the summary
    pub fn record_copies(&mut self, report: &CopyReport) {
        self.problem_files += report.problem_files;
        self.assets += report.assets;
        self.files_copied += report.copied_count();
        self.skipped_references += report.skipped_references;
        self.failures
            .extend(report.failures().map(|(path, message)| CopyFailure {
                path: path.to_path_buf(),
                message: message.to_string(),
            }));
    }

    /// Record course paths that were refused before any copy started
    pub fn record_rejected_paths(&mut self, rejected: &[RejectedPath]) {
        self.failures.extend(rejected.iter().map(|r| CopyFailure {
            path: PathBuf::from(&r.path),
            message: r.message.clone(),
        }));
    }

    /// Check if every copy succeeded
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get copy success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.files_copied + self.failures.len();
        if attempted == 0 {
            return 100.0;
        }
        (self.files_copied as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            course_id = self.course_id,
            def_files = self.def_files_written,
            problem_files = self.problem_files,
            assets = self.assets,
            copied = self.files_copied,
            failed = self.failures.len(),
            skipped_references = self.skipped_references,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Export completed with copy failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    path = %failure.path.display(),
                    message = %failure.message,
                    "Copy failure"
                );
            }
        }
    }
}

/// Appends one line per failure to the error log in `content_dir`
///
/// Each line reads `<path>: <message>` and goes out in a single write, so no
/// line is ever interleaved with another. Nothing is created when there are
/// no failures.
///
/// # Returns
///
/// The log path when at least one line was written.
pub async fn append_error_log(
    content_dir: &Path,
    failures: &[CopyFailure],
) -> Result<Option<PathBuf>> {
    if failures.is_empty() {
        return Ok(None);
    }

    let log_path = content_dir.join(ERROR_LOG_FILE);
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .await?;

    for failure in failures {
        let line = format!("{}: {}\n", failure.path.display(), failure.message);
        file.write_all(line.as_bytes()).await?;
    }
    file.flush().await?;

    Ok(Some(log_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::private_files::CopyOutcome;
    use tempfile::TempDir;

    fn failure(path: &str, message: &str) -> CopyFailure {
        CopyFailure {
            path: PathBuf::from(path),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(7);

        assert_eq!(summary.course_id, 7);
        assert_eq!(summary.def_files_written, 0);
        assert_eq!(summary.files_copied, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.failures.is_empty());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(1).with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_record_copies() {
        let report = CopyReport {
            outcomes: vec![
                CopyOutcome::Copied {
                    path: PathBuf::from("private/a.pg"),
                },
                CopyOutcome::Failed {
                    path: PathBuf::from("private/b.png"),
                    message: "No such file".to_string(),
                },
                CopyOutcome::Copied {
                    path: PathBuf::from("private/c.gif"),
                },
            ],
            problem_files: 1,
            assets: 2,
            skipped_references: 1,
        };

        let mut summary = ExportSummary::new(1);
        summary.record_copies(&report);

        assert_eq!(summary.files_copied, 2);
        assert_eq!(summary.assets, 2);
        assert_eq!(summary.skipped_references, 1);
        assert_eq!(summary.failures, vec![failure("private/b.png", "No such file")]);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_export_summary_success_rate() {
        let mut summary = ExportSummary::new(1);
        assert_eq!(summary.success_rate(), 100.0);

        summary.files_copied = 3;
        summary.failures.push(failure("private/x.png", "gone"));
        assert_eq!(summary.success_rate(), 75.0);
    }

    #[tokio::test]
    async fn test_error_log_skipped_without_failures() {
        let dir = TempDir::new().unwrap();
        let written = append_error_log(dir.path(), &[]).await.unwrap();

        assert!(written.is_none());
        assert!(!dir.path().join(ERROR_LOG_FILE).exists());
    }

    #[tokio::test]
    async fn test_error_log_one_line_per_failure() {
        let dir = TempDir::new().unwrap();
        let failures = vec![
            failure("private/a/one.png", "not found"),
            failure("private/a/two.gif", "permission denied"),
        ];

        append_error_log(dir.path(), &failures[..1]).await.unwrap();
        let path = append_error_log(dir.path(), &failures[1..])
            .await
            .unwrap()
            .unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "private/a/one.png: not found\nprivate/a/two.gif: permission denied\n"
        );
    }
}
