// Course Export - Course archive packager
// Copyright (c) 2025 Course Export Contributors
// Licensed under the MIT License

//! # Course Export
//!
//! Course Export packages a course (units, topics and questions) into a
//! gzip-compressed tar archive that a WeBWorK-style homework system can import.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Rendering** one assignment definition (`.def`) file per topic
//! - **Copying** `private/...` problem files out of the shared content root
//! - **Discovering** the images and other assets those problem files reference
//! - **Packaging** the staged tree into `<course name>.tgz`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (asset scanning, def files, export, archive)
//! - [`adapters`] - Course document sources
//! - [`domain`] - Course model, content paths and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use course_export::adapters::JsonCourseSource;
//! use course_export::config::load_config;
//! use course_export::core::export::CourseExporter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("course-export.toml")?;
//!     let source = JsonCourseSource::new("courses");
//!
//!     let exporter = CourseExporter::with_webwork_defs(&config);
//!     let artifact = exporter.export_by_id(&source, 42).await?;
//!
//!     println!("Wrote {}", artifact.archive_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Asset Scanning
//!
//! Problem files name their assets inside quoted strings. The scanner finds
//! `image(...)` calls and bare `.png`/`.gif`/`.jpg`/`.svg` strings in all
//! six quoting styles and skips commented-out lines and absolute URLs:
//!
//! ```rust
//! use course_export::core::assets::scan;
//!
//! let source = "BEGIN_TEXT\n\\{ image(\"graph.png\") \\}\n# image('old.png')\n";
//! let paths: Vec<String> = scan(source).filter_map(|r| r.dequote().ok()).collect();
//! assert_eq!(paths, vec!["graph.png".to_string()]);
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::ExportError`]. A private file that cannot
//! be copied is not an error: it is recorded in the archive's
//! `privateFileErrors.txt` and reported in the export summary.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
