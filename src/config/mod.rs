//! Configuration management for course exports.
//!
//! # Overview
//!
//! Configuration lives in a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - `COURSE_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use course_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("course-export.toml")?;
//!
//! println!("Content root: {}", config.paths.webwork_file_location.display());
//! println!("Staging under: {}", config.paths.working_temp_directory.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and fingerprint salt
//! - [`PathsConfig`] - Staging root, content root, course documents
//! - [`ExportConfig`] - Temp cleanup and copy concurrency
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [paths]
//! working_temp_directory = "/var/tmp/course-export"
//! webwork_file_location = "${WEBWORK_ROOT}"
//!
//! [export]
//! auto_delete_temp = true
//! max_concurrent_copies = 32
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, CourseExportConfig, Environment, ExportConfig, LoggingConfig, PathsConfig,
};
