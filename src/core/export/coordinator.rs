//! Export coordinator - main orchestrator for the export process
//!
//! This module drives one course through the whole pipeline: staging,
//! definition files, private file copies, the error log and the archive.

use crate::adapters::CourseSource;
use crate::config::CourseExportConfig;
use crate::core::archive::archive_directory;
use crate::core::deffile::{DefFileSerializer, DefFileWriter, WebworkDefSerializer};
use crate::core::export::private_files::PrivateFileCopier;
use crate::core::export::staging::StagingTree;
use crate::core::export::summary::{append_error_log, ExportSummary};
use crate::domain::{private_paths, Course, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Everything a finished export hands back to its caller
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Absolute path of the `.tgz` archive
    pub archive_path: PathBuf,

    /// Staging directory of the run; it also contains the archive
    pub working_directory: PathBuf,

    /// Counts, failures and timing of the run
    pub summary: ExportSummary,
}

impl ExportArtifact {
    /// Removes the staging directory, archive included
    ///
    /// Call this after the archive has been delivered elsewhere.
    pub async fn cleanup(&self) -> Result<()> {
        tokio::fs::remove_dir_all(&self.working_directory).await?;
        tracing::debug!(
            path = %self.working_directory.display(),
            "Removed staging directory"
        );
        Ok(())
    }
}

/// Course exporter
///
/// Holds everything derived from configuration so that several courses can
/// be exported with the same settings. Concurrent exports of different
/// courses may share one exporter; each stages under its own course id.
pub struct CourseExporter {
    temp_root: PathBuf,
    auto_delete_temp: bool,
    copier: PrivateFileCopier,
    def_writer: DefFileWriter,
}

impl CourseExporter {
    /// Create a new exporter from explicit configuration
    pub fn new(config: &CourseExportConfig, serializer: Arc<dyn DefFileSerializer>) -> Self {
        Self {
            temp_root: config.paths.working_temp_directory.clone(),
            auto_delete_temp: config.export.auto_delete_temp,
            copier: PrivateFileCopier::new(
                config.paths.webwork_file_location.clone(),
                config.export.max_concurrent_copies,
            ),
            def_writer: DefFileWriter::new(serializer),
        }
    }

    /// Create an exporter writing WeBWorK set definitions
    pub fn with_webwork_defs(config: &CourseExportConfig) -> Self {
        Self::new(config, Arc::new(WebworkDefSerializer::new()))
    }

    /// Whether callers should remove the staging directory after delivery
    pub fn auto_delete_temp(&self) -> bool {
        self.auto_delete_temp
    }

    /// Execute the export
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Recreates the staging directory for the course
    /// 2. Writes one definition file per topic
    /// 3. Collects private content paths from the course tree
    /// 4. Copies problem files and the assets they reference
    /// 5. Appends copy failures to the error log
    /// 6. Packs the content directory into an archive
    ///
    /// Copy failures do not fail the export; they are listed in the summary
    /// and in the archive's error log.
    ///
    /// # Errors
    ///
    /// Fatal errors (invalid course, staging, definition file or archive
    /// failures) are returned unmodified and no archive is produced.
    pub async fn export(&self, course: &Course) -> Result<ExportArtifact> {
        let start_time = Instant::now();
        crate::log_export_start!(course.id, course.name);

        let staging = StagingTree::prepare(&self.temp_root, course).await?;

        match self.run(course, &staging).await {
            Ok((archive_path, summary)) => {
                let summary = summary.with_duration(start_time.elapsed());
                summary.log_summary();
                crate::log_export_complete!(archive_path.display(), summary.duration);

                Ok(ExportArtifact {
                    archive_path,
                    working_directory: staging.working_directory().to_path_buf(),
                    summary,
                })
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Export aborted");
                if self.auto_delete_temp {
                    self.discard(staging.working_directory()).await;
                }
                Err(e)
            }
        }
    }

    /// Fetch a course through `source` and export it
    ///
    /// # Errors
    ///
    /// Propagates the source's errors, including
    /// [`crate::domain::ExportError::CourseNotFound`], and everything
    /// [`CourseExporter::export`] can return.
    pub async fn export_by_id(
        &self,
        source: &dyn CourseSource,
        course_id: i64,
    ) -> Result<ExportArtifact> {
        let course = source.fetch_course(course_id).await?;
        self.export(&course).await
    }

    async fn run(&self, course: &Course, staging: &StagingTree) -> Result<(PathBuf, ExportSummary)> {
        let content_dir = staging.content_directory();
        let mut summary = ExportSummary::new(course.id);

        let def_files = self.def_writer.write_course(content_dir, course).await?;
        summary.def_files_written = def_files.len();

        let collected = private_paths(course);
        tracing::info!(
            course_id = course.id,
            private_files = collected.paths.len(),
            rejected = collected.rejected.len(),
            "Copying private files"
        );
        let report = self.copier.copy_all(content_dir, &collected.paths).await;
        summary.record_rejected_paths(&collected.rejected);
        summary.record_copies(&report);

        append_error_log(content_dir, &summary.failures).await?;

        let archive_path = archive_directory(content_dir).await?;
        Ok((archive_path, summary))
    }

    async fn discard(&self, working_directory: &Path) {
        if let Err(e) = tokio::fs::remove_dir_all(working_directory).await {
            tracing::warn!(
                path = %working_directory.display(),
                error = %e,
                "Failed to remove staging directory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CourseExportConfig;
    use crate::domain::ExportError;
    use tempfile::TempDir;

    fn config(temp: &TempDir, auto_delete_temp: bool) -> CourseExportConfig {
        let mut config = CourseExportConfig::default();
        config.paths.working_temp_directory = temp.path().join("tmp");
        config.paths.webwork_file_location = temp.path().join("webwork");
        config.export.auto_delete_temp = auto_delete_temp;
        config
    }

    fn course(questions: &str) -> Course {
        Course::from_json_str(&format!(
            r#"{{"id": 9, "name": "Geometry", "units": [{{"name": "U1", "topics": [{{
                "name": "T1", "startDate": "2021-01-01T00:00:00Z",
                "endDate": "2021-01-02T00:00:00Z", "deadDate": "2021-01-03T00:00:00Z",
                "partialExtend": false, "topicTypeId": 1 {questions}}}]}}]}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_export_without_private_files() {
        let temp = TempDir::new().unwrap();
        let exporter = CourseExporter::with_webwork_defs(&config(&temp, true));

        let artifact = exporter
            .export(&course(r#", "questions": []"#))
            .await
            .unwrap();

        assert!(artifact.archive_path.is_file());
        assert_eq!(artifact.summary.def_files_written, 1);
        assert!(artifact.summary.is_successful());
        assert!(!artifact
            .working_directory
            .join("Geometry/privateFileErrors.txt")
            .exists());

        artifact.cleanup().await.unwrap();
        assert!(!artifact.working_directory.exists());
    }

    #[tokio::test]
    async fn test_fatal_error_discards_staging() {
        let temp = TempDir::new().unwrap();
        let exporter = CourseExporter::with_webwork_defs(&config(&temp, true));

        let result = exporter.export(&course("")).await;

        assert!(matches!(result, Err(ExportError::MissingQuestions { .. })));
        assert!(!temp.path().join("tmp/9").exists());
    }

    #[tokio::test]
    async fn test_fatal_error_keeps_staging_when_configured() {
        let temp = TempDir::new().unwrap();
        let exporter = CourseExporter::with_webwork_defs(&config(&temp, false));

        assert!(exporter.export(&course("")).await.is_err());
        assert!(temp.path().join("tmp/9/Geometry").is_dir());
        assert!(!temp.path().join("tmp/9/Geometry.tgz").exists());
    }
}
