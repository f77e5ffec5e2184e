//! Definition file tree writer

use super::DefFileSerializer;
use crate::core::export::staging::sanitize_path_component;
use crate::domain::{Course, ExportError, Result};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory under the content directory holding one folder per unit
pub const UNITS_DIR: &str = "units";

/// Writes `units/<unit>/set<topic>.def` for every topic of a course
#[derive(Clone)]
pub struct DefFileWriter {
    serializer: Arc<dyn DefFileSerializer>,
}

impl DefFileWriter {
    pub fn new(serializer: Arc<dyn DefFileSerializer>) -> Self {
        Self { serializer }
    }

    /// Serializes every topic and writes the files below `content_dir`
    ///
    /// All topics are serialized before anything touches the disk, so a topic
    /// without questions fails the run without leaving half a tree behind.
    /// When two topics map to the same file the first one in content order is
    /// kept.
    ///
    /// # Errors
    ///
    /// - [`ExportError::MissingQuestions`] if a topic has no question list
    /// - [`ExportError::DefFile`] if a file cannot be written
    pub async fn write_course(&self, content_dir: &Path, course: &Course) -> Result<Vec<PathBuf>> {
        let units_dir = content_dir.join(UNITS_DIR);
        let mut unit_dirs = Vec::with_capacity(course.units.len());
        let mut files: Vec<(PathBuf, String)> = Vec::with_capacity(course.topic_count());
        let mut seen = HashSet::new();

        for unit in &course.units {
            let unit_dir = units_dir.join(sanitize_path_component(&unit.name));
            unit_dirs.push(unit_dir.clone());

            for topic in &unit.topics {
                let questions =
                    topic
                        .questions
                        .as_deref()
                        .ok_or_else(|| ExportError::MissingQuestions {
                            unit: unit.name.clone(),
                            topic: topic.name.clone(),
                        })?;

                let path = unit_dir.join(format!("set{}.def", sanitize_path_component(&topic.name)));
                if !seen.insert(path.clone()) {
                    tracing::warn!(
                        unit = %unit.name,
                        topic = %topic.name,
                        path = %path.display(),
                        "Duplicate definition file name, keeping the first topic"
                    );
                    continue;
                }

                files.push((path, self.serializer.serialize(topic, questions)?));
            }
        }

        // Units without topics still get their directory.
        for unit_dir in &unit_dirs {
            tokio::fs::create_dir_all(unit_dir)
                .await
                .map_err(|e| def_file_error(unit_dir, e))?;
        }

        let writes = files.into_iter().map(|(path, contents)| async move {
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| def_file_error(&path, e))?;
            tracing::debug!(path = %path.display(), "Wrote definition file");
            Ok::<_, ExportError>(path)
        });

        try_join_all(writes).await
    }
}

fn def_file_error(path: &Path, error: std::io::Error) -> ExportError {
    ExportError::DefFile(format!("Failed to write {}: {error}", path.display()))
}
