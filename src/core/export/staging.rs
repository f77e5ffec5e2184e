//! Per-course working directory
//!
//! Each run stages into `<temp root>/<course id>/<course name>/`. The course
//! subdirectory is wiped at the start of a run so leftovers of an earlier run
//! never end up in the archive. Sibling courses under the same temp root are
//! left alone.

use crate::domain::{Course, ExportError, Result};
use std::path::{Path, PathBuf};

/// Makes a display name safe to use as a single path component
///
/// Only path separators are replaced; every other character is kept so the
/// archive mirrors the names instructors see. Empty names and the relative
/// components `.` and `..` become `_`.
pub fn sanitize_path_component(name: &str) -> String {
    match name {
        "" | "." | ".." => "_".to_string(),
        _ => name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect(),
    }
}

/// Staging directories of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTree {
    working_directory: PathBuf,
    content_directory: PathBuf,
}

impl StagingTree {
    /// Recreates the staging directories for `course` under `temp_root`
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Staging`] when the old tree cannot be removed or
    /// the new one cannot be created.
    pub async fn prepare(temp_root: &Path, course: &Course) -> Result<Self> {
        let working_directory = temp_root.join(course.id.to_string());
        let content_directory = working_directory.join(sanitize_path_component(&course.name));

        if tokio::fs::try_exists(&working_directory).await? {
            tracing::debug!(
                path = %working_directory.display(),
                "Removing stale staging directory"
            );
            tokio::fs::remove_dir_all(&working_directory)
                .await
                .map_err(|e| {
                    ExportError::Staging(format!(
                        "Failed to clear {}: {e}",
                        working_directory.display()
                    ))
                })?;
        }

        tokio::fs::create_dir_all(&content_directory)
            .await
            .map_err(|e| {
                ExportError::Staging(format!(
                    "Failed to create {}: {e}",
                    content_directory.display()
                ))
            })?;

        Ok(Self {
            working_directory,
            content_directory,
        })
    }

    /// `<temp root>/<course id>`, holds the content directory and the archive
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Directory that becomes the archive's single top-level entry
    pub fn content_directory(&self) -> &Path {
        &self.content_directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn course(id: i64, name: &str) -> Course {
        Course {
            id,
            name: name.to_string(),
            units: Vec::new(),
        }
    }

    #[test]
    fn test_sanitize_path_component() {
        assert_eq!(sanitize_path_component("Algebra I"), "Algebra I");
        assert_eq!(sanitize_path_component("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_path_component(""), "_");
        assert_eq!(sanitize_path_component("."), "_");
        assert_eq!(sanitize_path_component(".."), "_");
        assert_eq!(sanitize_path_component("..."), "...");
    }

    #[tokio::test]
    async fn test_prepare_creates_tree() {
        let temp = TempDir::new().unwrap();
        let staging = StagingTree::prepare(temp.path(), &course(3, "Calc/II"))
            .await
            .unwrap();

        assert_eq!(staging.working_directory(), temp.path().join("3"));
        assert_eq!(staging.content_directory(), temp.path().join("3").join("Calc_II"));
        assert!(staging.content_directory().is_dir());
    }

    #[tokio::test]
    async fn test_prepare_clears_only_its_course() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("3/Old")).unwrap();
        std::fs::write(temp.path().join("3/Old/stale.txt"), "x").unwrap();
        std::fs::create_dir_all(temp.path().join("4/Other")).unwrap();

        StagingTree::prepare(temp.path(), &course(3, "New"))
            .await
            .unwrap();

        assert!(!temp.path().join("3/Old").exists());
        assert!(temp.path().join("3/New").is_dir());
        assert!(temp.path().join("4/Other").is_dir());
    }
}
