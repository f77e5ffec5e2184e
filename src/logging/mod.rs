//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! JSON log files with rotation.
//!
//! # Example
//!
//! ```no_run
//! use course_export::logging::init_logging;
//! use course_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a course export
///
/// # Example
///
/// ```no_run
/// use course_export::log_export_start;
///
/// log_export_start!(42, "Algebra I");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($course_id:expr, $course_name:expr) => {
        tracing::info!(
            course_id = $course_id,
            course_name = %$course_name,
            "Starting export"
        );
    };
}

/// Log the completion of a course export
///
/// # Example
///
/// ```no_run
/// use course_export::log_export_complete;
/// use std::path::Path;
/// use std::time::Duration;
///
/// log_export_complete!(Path::new("tmp/42/Algebra.tgz").display(), Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($archive:expr, $duration:expr) => {
        tracing::info!(
            archive = %$archive,
            duration_ms = $duration.as_millis() as u64,
            "Export archive ready"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use course_export::log_error_with_context;
/// use course_export::domain::ExportError;
///
/// let error = ExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a file that could not be copied into the staging tree
///
/// # Example
///
/// ```no_run
/// use course_export::log_copy_failure;
///
/// log_copy_failure!("private/my/abc/diagram.gif", "No such file or directory");
/// ```
#[macro_export]
macro_rules! log_copy_failure {
    ($path:expr, $error:expr) => {
        tracing::warn!(
            path = %$path,
            error = %$error,
            "Failed to copy private file"
        );
    };
}
