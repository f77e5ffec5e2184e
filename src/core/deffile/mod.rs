//! Topic definition files
//!
//! Every topic of a course becomes one definition file in the archive. The
//! file format is pluggable through [`DefFileSerializer`]; the shipped
//! implementation is [`WebworkDefSerializer`].

pub mod webwork;
pub mod writer;

pub use webwork::WebworkDefSerializer;
pub use writer::{DefFileWriter, UNITS_DIR};

use crate::domain::{Question, Result, Topic};

/// Turns a topic into the text of its definition file
///
/// `questions` is the topic's question list, already checked to be present.
/// Implementations must be deterministic: the same input always produces the
/// same text.
pub trait DefFileSerializer: Send + Sync {
    fn serialize(&self, topic: &Topic, questions: &[Question]) -> Result<String>;
}
