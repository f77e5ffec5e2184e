//! Domain error types
//!
//! This module defines the error hierarchy for course exports. Only errors that
//! abort a whole run live here; a single file that cannot be copied is reported
//! through [`crate::core::export::CopyOutcome`] instead.

use thiserror::Error;

/// Main export error type
///
/// Every variant is fatal for the run that produced it: no archive is written
/// and the error is surfaced to the caller unmodified.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Course input failed the boundary validator
    #[error("Validation error: {0}")]
    Validation(String),

    /// A topic arrived without its question list
    #[error("Topic '{topic}' in unit '{unit}' has no question list")]
    MissingQuestions { unit: String, topic: String },

    /// The course source has no record for the requested id
    #[error("Course ({0}) not found")]
    CourseNotFound(i64),

    /// Staging directory could not be prepared
    #[error("Staging error: {0}")]
    Staging(String),

    /// Definition file could not be produced or written
    #[error("Definition file error: {0}")]
    DefFile(String),

    /// Archive stream failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_display() {
        let err = ExportError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_missing_questions_display() {
        let err = ExportError::MissingQuestions {
            unit: "U1".to_string(),
            topic: "T1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Topic 'T1' in unit 'U1' has no question list"
        );
    }

    #[test]
    fn test_course_not_found_display() {
        assert_eq!(
            ExportError::CourseNotFound(42).to_string(),
            "Course (42) not found"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ExportError = io_err.into();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ExportError = json_err.into();
        assert!(matches!(err, ExportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ExportError = toml_err.into();
        assert!(matches!(err, ExportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_export_error_implements_std_error() {
        let err = ExportError::Archive("stream closed".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
