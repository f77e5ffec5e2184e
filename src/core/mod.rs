//! Core business logic for course export.
//!
//! # Modules
//!
//! - [`assets`] - Asset reference scanning in problem source files
//! - [`deffile`] - Assignment definition (`.def`) file rendering and writing
//! - [`export`] - Staging, private file copying and export orchestration
//! - [`archive`] - Gzip-compressed tar packaging of the staging tree
//!
//! # Export Workflow
//!
//! 1. **Stage**: Create `<temp>/<course id>/<course name>/`
//! 2. **Define**: Write one `.def` file per topic under `units/<unit name>/`
//! 3. **Copy**: Copy every `private/...` problem file and the assets it references
//! 4. **Record**: Append copy failures to `privateFileErrors.txt`
//! 5. **Package**: Archive the content directory into `<course name>.tgz`
//!
//! # Example
//!
//! ```rust,no_run
//! use course_export::adapters::load_course_file;
//! use course_export::config::load_config;
//! use course_export::core::export::CourseExporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("course-export.toml")?;
//! let course = load_course_file(std::path::Path::new("course.json")).await?;
//!
//! let exporter = CourseExporter::with_webwork_defs(&config);
//! let artifact = exporter.export(&course).await?;
//!
//! println!("Archive: {}", artifact.archive_path.display());
//! println!("Missing files: {}", artifact.summary.failures.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod assets;
pub mod deffile;
pub mod export;
