//! Export command implementation
//!
//! This module implements the `export` command, which packages one course
//! into a `.tgz` archive.

use crate::adapters::{load_course_file, JsonCourseSource};
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::config::load_config;
use crate::core::export::{CourseExporter, ExportArtifact};
use clap::Args;
use std::path::{Path, PathBuf};

/// Maximum number of copy failures printed to the console
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Course JSON document to export
    #[arg(
        long,
        value_name = "FILE",
        required_unless_present = "course_id",
        conflicts_with = "course_id"
    )]
    pub course: Option<PathBuf>,

    /// Course id to load from paths.course_directory
    #[arg(long, value_name = "ID")]
    pub course_id: Option<i64>,

    /// Where to place the archive: a file path or an existing directory
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep the staging directory even when export.auto_delete_temp is set
    #[arg(long)]
    pub keep_temp: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");

        let exporter = CourseExporter::with_webwork_defs(&config);

        let result = match (&self.course, self.course_id) {
            (Some(path), _) => match load_course_file(path).await {
                Ok(course) => exporter.export(&course).await,
                Err(e) => Err(e),
            },
            (None, Some(course_id)) => {
                let Some(directory) = &config.paths.course_directory else {
                    eprintln!("--course-id requires paths.course_directory to be configured");
                    return Ok(EXIT_CONFIG_ERROR);
                };
                let source = JsonCourseSource::new(directory);
                exporter.export_by_id(&source, course_id).await
            }
            (None, None) => {
                eprintln!("Either --course or --course-id is required");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let remove_staging = exporter.auto_delete_temp() && !self.keep_temp;
        let destination = match (&self.output, remove_staging) {
            (Some(output), _) => Some(output.as_path()),
            // The archive lives inside the staging directory, move it out first.
            (None, true) => Some(Path::new(".")),
            (None, false) => None,
        };

        let archive_path = match destination {
            Some(destination) => match deliver(&artifact.archive_path, destination).await {
                Ok(path) => path,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to deliver archive");
                    eprintln!("Failed to deliver archive: {e}");
                    return Ok(EXIT_FATAL);
                }
            },
            None => artifact.archive_path.clone(),
        };

        if remove_staging {
            if let Err(e) = artifact.cleanup().await {
                tracing::warn!(error = %e, "Failed to remove staging directory");
            }
        }

        print_summary(&artifact, &archive_path);

        if artifact.summary.is_successful() {
            println!("✅ Export completed successfully!");
            Ok(EXIT_SUCCESS)
        } else {
            println!("⚠️  Export completed with missing private files");
            Ok(EXIT_PARTIAL)
        }
    }
}

/// Copies the archive to `destination`, which may be a directory
async fn deliver(archive: &Path, destination: &Path) -> anyhow::Result<PathBuf> {
    let target = if tokio::fs::metadata(destination)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        let file_name = archive
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("archive path has no file name"))?;
        destination.join(file_name)
    } else {
        destination.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::copy(archive, &target).await?;
    tracing::info!(path = %target.display(), "Archive delivered");
    Ok(target)
}

fn print_summary(artifact: &ExportArtifact, archive_path: &Path) {
    let summary = &artifact.summary;

    println!();
    println!("📊 Export Summary:");
    println!("  Course: {}", summary.course_id);
    println!("  Archive: {}", archive_path.display());
    println!("  Definition files: {}", summary.def_files_written);
    println!("  Private problem files: {}", summary.problem_files);
    println!("  Assets discovered: {}", summary.assets);
    println!("  Files copied: {}", summary.files_copied);
    println!("  Files missing: {}", summary.failures.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Missing files (see privateFileErrors.txt in the archive):");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {}: {}", failure.path.display(), failure.message);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more",
                summary.failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs {
            course: Some(PathBuf::from("course.json")),
            course_id: None,
            output: None,
            keep_temp: false,
        };

        assert!(args.output.is_none());
        assert!(!args.keep_temp);
    }

    #[tokio::test]
    async fn test_deliver_into_directory() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("Algebra.tgz");
        std::fs::write(&archive, b"archive").unwrap();
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let delivered = deliver(&archive, &out).await.unwrap();

        assert_eq!(delivered, out.join("Algebra.tgz"));
        assert_eq!(std::fs::read(delivered).unwrap(), b"archive");
    }

    #[tokio::test]
    async fn test_deliver_to_file_path() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("Algebra.tgz");
        std::fs::write(&archive, b"archive").unwrap();
        let target = temp.path().join("exports/course-1.tgz");

        let delivered = deliver(&archive, &target).await.unwrap();

        assert_eq!(delivered, target);
        assert!(target.is_file());
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = ExportArgs {
            course: Some(PathBuf::from("course.json")),
            course_id: None,
            output: None,
            keep_temp: false,
        };

        let code = args.execute("does-not-exist.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
