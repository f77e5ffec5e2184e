//! Course record retrieval
//!
//! The exporter only needs a fully loaded course tree. Where that tree comes
//! from is behind [`CourseSource`]; [`JsonCourseSource`] reads one JSON
//! document per course from a directory.

use crate::domain::{Course, ExportError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of course records
///
/// Implementations must return the complete tree: every unit with its topics,
/// and every topic with its question list and assessment settings.
#[async_trait]
pub trait CourseSource: Send + Sync {
    /// Fetch the course with the given id
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::CourseNotFound`] when no such course exists.
    async fn fetch_course(&self, course_id: i64) -> Result<Course>;
}

/// Reads `<directory>/<course id>.json`
#[derive(Debug, Clone)]
pub struct JsonCourseSource {
    directory: PathBuf,
}

impl JsonCourseSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn document_path(&self, course_id: i64) -> PathBuf {
        self.directory.join(format!("{course_id}.json"))
    }
}

#[async_trait]
impl CourseSource for JsonCourseSource {
    async fn fetch_course(&self, course_id: i64) -> Result<Course> {
        let path = self.document_path(course_id);
        if !tokio::fs::try_exists(&path).await? {
            return Err(ExportError::CourseNotFound(course_id));
        }

        let course = load_course_file(&path).await?;
        if course.id != course_id {
            return Err(ExportError::Validation(format!(
                "{} holds course {} instead of {course_id}",
                path.display(),
                course.id
            )));
        }

        tracing::debug!(course_id, path = %path.display(), "Loaded course document");
        Ok(course)
    }
}

/// Reads and strictly validates one course document
///
/// # Errors
///
/// - [`ExportError::Io`] if the file cannot be read
/// - [`ExportError::Validation`] if the document does not match the schema
pub async fn load_course_file(path: &Path) -> Result<Course> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        ExportError::Io(format!("Failed to read course file {}: {e}", path.display()))
    })?;
    Course::from_json_str(&contents)
}
