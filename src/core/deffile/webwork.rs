//! WeBWorK set definition format
//!
//! Produces `key = value` header lines followed by a `problemListV2` section
//! with one `problem_start` / `problem_end` block per question. Output depends
//! only on the topic, so the same course always yields byte-identical files.

use super::DefFileSerializer;
use crate::domain::{ExportError, Question, Result, Topic, TopicAssessmentInfo};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const DATE_FORMAT: &str = "%m/%d/%Y at %I:%M%P UTC";

/// Serializer for WeBWorK `.def` set definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct WebworkDefSerializer;

impl WebworkDefSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl DefFileSerializer for WebworkDefSerializer {
    fn serialize(&self, topic: &Topic, questions: &[Question]) -> Result<String> {
        let mut out = DefBuilder::default();

        let assignment_type = if topic.is_assessment() {
            "gateway"
        } else {
            "default"
        };
        let due_date = if topic.partial_extend {
            topic.dead_date
        } else {
            topic.end_date
        };

        out.field("assignmentType", assignment_type);
        out.field("openDate", format_date(&topic.start_date));
        out.field("reducedScoringDate", format_date(&topic.end_date));
        out.field("dueDate", format_date(&due_date));
        out.field("answerDate", format_date(&topic.dead_date));
        out.field("enableReducedScoring", yes_no(topic.partial_extend));
        out.field("paperHeaderFile", "");
        out.field("screenHeaderFile", "");
        out.field("description", describe(topic.description.as_ref())?);

        if let Some(info) = &topic.topic_assessment_info {
            write_gateway_fields(&mut out, info)?;
        }

        out.blank();
        out.line("problemListV2");
        for question in questions {
            write_problem(&mut out, question);
        }

        Ok(out.finish())
    }
}

fn write_gateway_fields(out: &mut DefBuilder, info: &TopicAssessmentInfo) -> Result<()> {
    out.field("timeInterval", minutes_to_seconds("versionDelay", info.version_delay)?);
    out.field("versionsPerInterval", info.max_versions);
    out.field("versionTimeLimit", minutes_to_seconds("duration", info.duration)?);
    out.field("problemRandOrder", flag(info.randomize_order));
    out.field("problemsPerPage", 0);
    out.field("hideScore", yes_no(!info.show_total_grade_immediately));
    out.field("hideScoreByProblem", yes_no(!info.show_itemized_results));
    out.field("hideWork", yes_no(info.hide_problems_after_finish));
    out.field("capTimeLimit", flag(info.hard_cutoff));
    out.field("attemptsPerVersion", info.max_graded_attempts_per_version);
    out.field("hideHint", flag(info.hide_hints));
    Ok(())
}

/// Minutes in the course model, seconds in the set definition
fn minutes_to_seconds(field: &str, minutes: i64) -> Result<i64> {
    minutes.checked_mul(60).ok_or_else(|| {
        ExportError::Validation(format!(
            "{field} of {minutes} minutes is too large to express in seconds"
        ))
    })
}

fn write_problem(out: &mut DefBuilder, question: &Question) {
    out.line("problem_start");
    out.field("problem_id", question.problem_number);
    out.field("source_file", &question.webwork_question_path);
    out.field("value", question.weight);
    out.field("max_attempts", question.max_attempts);
    out.field("counts_parent_grade", 0);
    out.field("rederlyOptional", yes_no(question.optional));

    if let Some(info) = &question.course_question_assessment_info {
        if !info.additional_problem_paths.is_empty() {
            out.field(
                "rederlyAdditionalPaths",
                info.additional_problem_paths.join(","),
            );
        }
        if !info.random_seed_set.is_empty() {
            let seeds: Vec<String> = info.random_seed_set.iter().map(i64::to_string).collect();
            out.field("rederlyRandomSeedRestrictions", seeds.join(","));
        }
    }
    out.line("problem_end");
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Y"
    } else {
        "N"
    }
}

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Compact JSON keeps multi-line descriptions on a single line
fn describe(description: Option<&serde_json::Value>) -> Result<String> {
    match description {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(value) => Ok(serde_json::to_string(value)?),
    }
}

#[derive(Default)]
struct DefBuilder {
    text: String,
}

impl DefBuilder {
    fn field(&mut self, key: &str, value: impl std::fmt::Display) {
        let value = value.to_string();
        // Writing into a String cannot fail.
        let _ = if value.is_empty() {
            writeln!(self.text, "{key} =")
        } else {
            writeln!(self.text, "{key} = {value}")
        };
    }

    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}
