//! External system integrations
//!
//! - [`course_source`] - where course records come from
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be driven by any storage and tested with in-memory fakes.
//!
//! ```rust,no_run
//! use course_export::adapters::{CourseSource, JsonCourseSource};
//!
//! # async fn example() -> course_export::domain::Result<()> {
//! let source = JsonCourseSource::new("/srv/courses");
//! let course = source.fetch_course(42).await?;
//! println!("{} has {} units", course.name, course.units.len());
//! # Ok(())
//! # }
//! ```

pub mod course_source;

pub use course_source::{load_course_file, CourseSource, JsonCourseSource};
