//! Export orchestration
//!
//! This module provides the export pipeline, including:
//! - Per-course staging directories
//! - Concurrent private file and asset copying
//! - Export coordination and orchestration
//! - Summary and error log reporting

pub mod coordinator;
pub mod private_files;
pub mod staging;
pub mod summary;

pub use coordinator::{CourseExporter, ExportArtifact};
pub use private_files::{CopyOutcome, CopyReport, PrivateFileCopier};
pub use staging::{sanitize_path_component, StagingTree};
pub use summary::{append_error_log, CopyFailure, ExportSummary, ERROR_LOG_FILE};
