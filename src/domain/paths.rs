//! Content path types with validation
//!
//! Questions point at problem files through content paths. Paths under the
//! reserved `private/` prefix belong to a single course instance and must be
//! shipped inside the archive; everything else is publicly resolvable.

use super::course::Course;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Reserved prefix of per-course content
pub const PRIVATE_PREFIX: &str = "private/";

/// Private content path newtype wrapper
///
/// # Examples
///
/// ```
/// use course_export::domain::paths::PrivateContentPath;
///
/// let path = PrivateContentPath::new("private/my/abc/prob.pg").unwrap();
/// assert_eq!(path.as_str(), "private/my/abc/prob.pg");
/// assert!(PrivateContentPath::new("Library/Rochester/prob.pg").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrivateContentPath(String);

impl PrivateContentPath {
    /// Creates a new PrivateContentPath
    ///
    /// # Returns
    ///
    /// Returns `Err` if the path does not start with `private/` or if it
    /// climbs out of the private tree with `..` segments.
    pub fn new(path: impl Into<String>) -> Result<Self, String> {
        let path = path.into();
        if !path.starts_with(PRIVATE_PREFIX) {
            return Err(format!("Not a private content path: {path}"));
        }

        let normalized = normalize_relative(Path::new(""), Path::new(&path))
            .ok_or_else(|| format!("Content path escapes its root: {path}"))?;
        if !normalized.starts_with("private") || normalized == Path::new("private") {
            return Err(format!("Content path escapes the private tree: {path}"));
        }

        Ok(Self(path))
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory containing the problem file, relative to the content root
    pub fn parent_dir(&self) -> &Path {
        Path::new(&self.0).parent().unwrap_or_else(|| Path::new(""))
    }

    /// Resolves a reference found inside this problem file
    ///
    /// The reference is taken relative to the directory of the problem file.
    /// `..` segments are allowed as long as the result stays inside the
    /// content root; absolute references are rejected.
    pub fn resolve_reference(&self, reference: &str) -> Result<PathBuf, String> {
        normalize_relative(self.parent_dir(), Path::new(reference)).ok_or_else(|| {
            format!(
                "Unresolvable asset reference '{reference}' from {}",
                self.0
            )
        })
    }
}

impl fmt::Display for PrivateContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PrivateContentPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PrivateContentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A `private/...` course path that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPath {
    /// Path as written in the course record
    pub path: String,

    /// Why the path was refused
    pub message: String,
}

/// Private content paths of a course, split into usable and refused ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivatePaths {
    /// Paths to copy, in first-occurrence order
    pub paths: Vec<PrivateContentPath>,

    /// Paths that start with `private/` but cannot be copied safely
    pub rejected: Vec<RejectedPath>,
}

/// Collects the private content paths of a course
///
/// Question paths come first, followed by any private entries of the
/// question's `additionalProblemPaths`. The result is deduplicated with the
/// first occurrence winning, so a path is fetched at most once per run.
/// Invalid private paths end up in [`PrivatePaths::rejected`] so the run can
/// report them.
pub fn private_paths(course: &Course) -> PrivatePaths {
    let mut seen = HashSet::new();
    let mut collected = PrivatePaths::default();

    for question in course.questions() {
        let additional = question
            .course_question_assessment_info
            .iter()
            .flat_map(|info| info.additional_problem_paths.iter());

        for candidate in std::iter::once(&question.webwork_question_path).chain(additional) {
            if !candidate.starts_with(PRIVATE_PREFIX) || !seen.insert(candidate.as_str()) {
                continue;
            }
            match PrivateContentPath::new(candidate.as_str()) {
                Ok(path) => collected.paths.push(path),
                Err(message) => {
                    tracing::warn!(
                        question_id = question.id,
                        path = %candidate,
                        error = %message,
                        "Invalid private content path"
                    );
                    collected.rejected.push(RejectedPath {
                        path: candidate.clone(),
                        message,
                    });
                }
            }
        }
    }

    collected
}

/// Lexically joins `reference` onto `base`, folding `.` and `..`
///
/// Returns `None` for absolute references or when `..` would climb above the
/// root that `base` is relative to.
fn normalize_relative(base: &Path, reference: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in base.components().chain(reference.components()) {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.into_iter().collect())
}
