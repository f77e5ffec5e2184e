//! Domain models and types for course exports.
//!
//! The domain layer provides:
//! - **Course tree models** ([`Course`], [`Unit`], [`Topic`], [`Question`])
//! - **Strongly-typed content paths** ([`PrivateContentPath`])
//! - **Error types** ([`ExportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use course_export::domain::{private_paths, Course};
//!
//! # fn example(json: &str) -> course_export::domain::Result<()> {
//! let course = Course::from_json_str(json)?;
//! let collected = private_paths(&course);
//! for path in &collected.paths {
//!     println!("will copy {path}");
//! }
//! for rejected in &collected.rejected {
//!     println!("refusing {}: {}", rejected.path, rejected.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod course;
pub mod errors;
pub mod paths;
pub mod result;

// Re-export commonly used types for convenience
pub use course::{Course, Question, QuestionAssessmentInfo, Topic, TopicAssessmentInfo, Unit};
pub use errors::ExportError;
pub use paths::{private_paths, PrivateContentPath, PrivatePaths, RejectedPath, PRIVATE_PREFIX};
pub use result::Result;
