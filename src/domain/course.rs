//! Course tree models
//!
//! These types are the input contract of an export: a course with its units,
//! topics and questions, exactly as the delivery layer hands it over. Parsing is
//! strict, so unknown fields are rejected at the boundary instead of silently
//! dropped.

use super::errors::ExportError;
use super::result::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root of a course tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Course {
    /// Course identifier, also the staging subdirectory name
    pub id: i64,

    /// Display name, used for the archive's top-level directory
    pub name: String,

    /// Units in content order
    pub units: Vec<Unit>,
}

impl Course {
    /// Parses and validates a course from its JSON representation
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Validation`] if the document does not match the
    /// schema, including unknown or missing fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExportError::Validation(format!("Invalid course document: {e}")))
    }

    /// Iterates over every question of the course in content order
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.units
            .iter()
            .flat_map(|unit| unit.topics.iter())
            .flat_map(|topic| topic.questions.iter().flatten())
    }

    /// Total number of topics across all units
    pub fn topic_count(&self) -> usize {
        self.units.iter().map(|unit| unit.topics.len()).sum()
    }
}

/// A unit groups topics and becomes one directory under `units/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Unit {
    #[serde(default)]
    pub id: Option<i64>,

    pub name: String,

    pub topics: Vec<Topic>,
}

/// A topic produces one definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Topic {
    #[serde(default)]
    pub id: Option<i64>,

    pub name: String,

    /// When the topic opens
    pub start_date: DateTime<Utc>,

    /// When full credit ends
    pub end_date: DateTime<Utc>,

    /// When partial credit ends and answers become available
    pub dead_date: DateTime<Utc>,

    /// Whether submissions between end and dead date earn partial credit
    pub partial_extend: bool,

    /// Free-form description, any JSON value
    #[serde(default)]
    pub description: Option<serde_json::Value>,

    pub topic_type_id: i64,

    /// Questions in problem order; `None` when the source did not load them
    #[serde(default)]
    pub questions: Option<Vec<Question>>,

    /// Exam settings, present only for assessment topics
    #[serde(default)]
    pub topic_assessment_info: Option<TopicAssessmentInfo>,
}

impl Topic {
    /// Whether this topic is an exam
    pub fn is_assessment(&self) -> bool {
        self.topic_assessment_info.is_some()
    }
}

/// Exam settings of a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TopicAssessmentInfo {
    /// Time limit per version in minutes
    pub duration: i64,
    pub hard_cutoff: bool,
    pub hide_hints: bool,
    pub hide_problems_after_finish: bool,
    pub max_graded_attempts_per_version: i64,
    pub max_versions: i64,
    pub randomize_order: bool,
    pub show_itemized_results: bool,
    pub show_total_grade_immediately: bool,
    /// Delay between versions in minutes
    pub version_delay: i64,
}

/// A single problem of a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Question {
    pub id: i64,

    pub problem_number: i64,

    /// Content path of the problem file, e.g. `private/my/abc/prob.pg`
    pub webwork_question_path: String,

    pub weight: f64,

    /// Maximum attempts, negative for unlimited
    pub max_attempts: i64,

    pub optional: bool,

    #[serde(default)]
    pub course_question_assessment_info: Option<QuestionAssessmentInfo>,
}

/// Exam settings of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuestionAssessmentInfo {
    pub random_seed_set: Vec<i64>,
    pub additional_problem_paths: Vec<String>,
}
