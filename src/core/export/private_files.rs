//! Private problem file and asset copying
//!
//! Every private problem file is copied from the content root into the staging
//! tree, scanned for asset references, and each resolvable reference is copied
//! next to it. All copies run concurrently and each one settles on its own:
//! a failed copy becomes a [`CopyOutcome::Failed`] and never stops the others.

use crate::core::assets::{scan, ReferenceForm};
use crate::domain::PrivateContentPath;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Result of one copy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The file now exists in the staging tree
    Copied { path: PathBuf },

    /// The file could not be copied; `message` says why
    Failed { path: PathBuf, message: String },
}

impl CopyOutcome {
    /// Content-relative path of the file this outcome is about
    pub fn path(&self) -> &Path {
        match self {
            CopyOutcome::Copied { path } | CopyOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CopyOutcome::Failed { .. })
    }
}

/// All outcomes of a copy run, in settle order
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    /// One outcome per scheduled copy and per unresolvable reference
    pub outcomes: Vec<CopyOutcome>,

    /// Distinct problem files scheduled
    pub problem_files: usize,

    /// Distinct assets scheduled after scanning
    pub assets: usize,

    /// References with nothing between their delimiters, skipped silently
    pub skipped_references: usize,
}

impl CopyReport {
    pub fn copied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Iterates over failed outcomes as `(path, message)` pairs
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CopyOutcome::Failed { path, message } => Some((path.as_path(), message.as_str())),
            CopyOutcome::Copied { .. } => None,
        })
    }
}

/// What a settled copy task hands back to the aggregation loop
enum Settled {
    Problem {
        outcome: CopyOutcome,
        source: PrivateContentPath,
        assets: Vec<PathBuf>,
        unresolved: Vec<CopyOutcome>,
        skipped: usize,
    },
    Asset(CopyOutcome),
}

/// Copies private problem files and their assets into a staging tree
///
/// # Example
///
/// ```no_run
/// use course_export::core::export::PrivateFileCopier;
/// use course_export::domain::PrivateContentPath;
/// use std::path::Path;
///
/// # async fn example() -> course_export::domain::Result<()> {
/// let copier = PrivateFileCopier::new("/srv/webwork-open-problem-library", 32);
/// let paths = vec![PrivateContentPath::new("private/my/abc/prob.pg").unwrap()];
/// let report = copier.copy_all(Path::new("tmp/1/Algebra"), &paths).await;
/// println!("{} copied, {} failed", report.copied_count(), report.failure_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PrivateFileCopier {
    source_root: PathBuf,
    permits: Arc<Semaphore>,
}

impl PrivateFileCopier {
    /// Creates a copier reading from `source_root`
    ///
    /// At most `max_concurrency` file operations are in flight at once.
    pub fn new(source_root: impl Into<PathBuf>, max_concurrency: usize) -> Self {
        Self {
            source_root: source_root.into(),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Copies every path and every asset it references into `content_dir`
    ///
    /// Returns after all attempts have settled. A destination is copied at
    /// most once per call, whether it was named directly or referenced by
    /// several problem files.
    pub async fn copy_all(&self, content_dir: &Path, paths: &[PrivateContentPath]) -> CopyReport {
        let mut report = CopyReport::default();
        let mut scheduled: HashSet<PathBuf> = HashSet::new();
        let mut pending: FuturesUnordered<BoxFuture<'_, Settled>> = FuturesUnordered::new();

        for path in paths {
            if !scheduled.insert(PathBuf::from(path.as_str())) {
                continue;
            }
            report.problem_files += 1;
            pending.push(self.copy_problem(content_dir, path.clone()).boxed());
        }

        while let Some(settled) = pending.next().await {
            match settled {
                Settled::Problem {
                    outcome,
                    source,
                    assets,
                    unresolved,
                    skipped,
                } => {
                    report.outcomes.push(outcome);
                    report.outcomes.extend(unresolved);
                    report.skipped_references += skipped;

                    for asset in assets {
                        if !scheduled.insert(asset.clone()) {
                            continue;
                        }
                        report.assets += 1;
                        pending.push(self.copy_asset(content_dir, asset, source.clone()).boxed());
                    }
                }
                Settled::Asset(outcome) => report.outcomes.push(outcome),
            }
        }

        tracing::debug!(
            problem_files = report.problem_files,
            assets = report.assets,
            copied = report.copied_count(),
            failed = report.failure_count(),
            "Private file copy settled"
        );

        report
    }

    async fn copy_problem(&self, content_dir: &Path, source: PrivateContentPath) -> Settled {
        let relative = PathBuf::from(source.as_str());

        let text = match self.copy_and_read(&relative, content_dir).await {
            Ok(text) => text,
            Err(e) => {
                crate::log_copy_failure!(relative.display(), e);
                return Settled::Problem {
                    outcome: CopyOutcome::Failed {
                        path: relative,
                        message: format!("Failed to copy problem file: {e}"),
                    },
                    source,
                    assets: Vec::new(),
                    unresolved: Vec::new(),
                    skipped: 0,
                };
            }
        };

        let mut assets = Vec::new();
        let mut unresolved = Vec::new();
        let mut skipped = 0;

        for reference in scan(&text) {
            let target = match reference.dequote() {
                Ok(target) => target,
                Err(e) if e.is_soft() => {
                    tracing::warn!(
                        problem = %source,
                        offset = reference.offset,
                        error = %e,
                        "Skipping asset reference"
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    crate::log_copy_failure!(source, e);
                    unresolved.push(CopyOutcome::Failed {
                        path: relative.clone(),
                        message: format!(
                            "Unusable asset reference at byte {}: {e}",
                            reference.offset
                        ),
                    });
                    continue;
                }
            };

            match source.resolve_reference(&target) {
                Ok(asset) => {
                    tracing::trace!(
                        problem = %source,
                        asset = %asset.display(),
                        image_call = reference.form == ReferenceForm::ImageCall,
                        "Found asset reference"
                    );
                    assets.push(asset);
                }
                Err(message) => {
                    crate::log_copy_failure!(target, message);
                    unresolved.push(CopyOutcome::Failed {
                        path: PathBuf::from(target),
                        message,
                    });
                }
            }
        }

        Settled::Problem {
            outcome: CopyOutcome::Copied { path: relative },
            source,
            assets,
            unresolved,
            skipped,
        }
    }

    async fn copy_asset(
        &self,
        content_dir: &Path,
        asset: PathBuf,
        referenced_by: PrivateContentPath,
    ) -> Settled {
        let outcome = match self.copy_file(&asset, content_dir).await {
            Ok(()) => CopyOutcome::Copied { path: asset },
            Err(e) => {
                crate::log_copy_failure!(asset.display(), e);
                CopyOutcome::Failed {
                    message: format!("Failed to copy asset referenced by {referenced_by}: {e}"),
                    path: asset,
                }
            }
        };
        Settled::Asset(outcome)
    }

    async fn copy_and_read(&self, relative: &Path, content_dir: &Path) -> io::Result<String> {
        self.copy_file(relative, content_dir).await?;

        let _permit = self.acquire().await?;
        let bytes = tokio::fs::read(content_dir.join(relative)).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn copy_file(&self, relative: &Path, content_dir: &Path) -> io::Result<()> {
        let from = self.source_root.join(relative);
        let to = content_dir.join(relative);

        let _permit = self.acquire().await?;
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&from, &to).await?;
        Ok(())
    }

    async fn acquire(&self) -> io::Result<tokio::sync::SemaphorePermit<'_>> {
        self.permits.acquire().await.map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn private(path: &str) -> PrivateContentPath {
        PrivateContentPath::new(path).unwrap()
    }

    #[tokio::test]
    async fn test_copies_problem_and_image() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(
            source.path(),
            "private/my/abc/prob.pg",
            "BEGIN_TEXT\n\\{ image(\"diagram.gif\", width => 200) \\}\nEND_TEXT\n",
        );
        write(source.path(), "private/my/abc/diagram.gif", "GIF89a");

        let copier = PrivateFileCopier::new(source.path(), 4);
        let report = copier
            .copy_all(staging.path(), &[private("private/my/abc/prob.pg")])
            .await;

        assert_eq!(report.failure_count(), 0);
        assert_eq!(report.copied_count(), 2);
        assert_eq!(report.problem_files, 1);
        assert_eq!(report.assets, 1);
        assert_eq!(
            fs::read(staging.path().join("private/my/abc/diagram.gif")).unwrap(),
            b"GIF89a"
        );
    }

    #[tokio::test]
    async fn test_missing_problem_does_not_stop_others() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(source.path(), "private/a/one.pg", "one");
        write(source.path(), "private/a/three.pg", "three");

        let copier = PrivateFileCopier::new(source.path(), 1);
        let report = copier
            .copy_all(
                staging.path(),
                &[
                    private("private/a/one.pg"),
                    private("private/a/two.pg"),
                    private("private/a/three.pg"),
                ],
            )
            .await;

        assert_eq!(report.copied_count(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("private/a/two.pg"));
        assert!(staging.path().join("private/a/three.pg").exists());
    }

    #[tokio::test]
    async fn test_missing_asset_is_a_single_failure() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(
            source.path(),
            "private/p/prob.pg",
            "$a = 'here.png';\n$b = \"gone.svg\";\n",
        );
        write(source.path(), "private/p/here.png", "png");

        let copier = PrivateFileCopier::new(source.path(), 8);
        let report = copier
            .copy_all(staging.path(), &[private("private/p/prob.pg")])
            .await;

        assert_eq!(report.copied_count(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("private/p/gone.svg"));
        assert!(failures[0].1.contains("private/p/prob.pg"));
    }

    #[tokio::test]
    async fn test_shared_asset_copied_once() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(source.path(), "private/s/a.pg", "image('../shared/logo.png')");
        write(source.path(), "private/t/b.pg", "image('../shared/logo.png')");
        write(source.path(), "private/shared/logo.png", "logo");

        let copier = PrivateFileCopier::new(source.path(), 8);
        let report = copier
            .copy_all(
                staging.path(),
                &[private("private/s/a.pg"), private("private/t/b.pg")],
            )
            .await;

        assert_eq!(report.assets, 1);
        assert_eq!(report.copied_count(), 3);
        assert!(staging.path().join("private/shared/logo.png").exists());
    }

    #[tokio::test]
    async fn test_escaping_reference_fails_without_copy() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(source.path(), "private/x/prob.pg", "image('../../../secret.png')");

        let copier = PrivateFileCopier::new(source.path(), 2);
        let report = copier
            .copy_all(staging.path(), &[private("private/x/prob.pg")])
            .await;

        assert_eq!(report.assets, 0);
        assert_eq!(report.failure_count(), 1);
    }

    #[tokio::test]
    async fn test_unbalanced_reference_is_logged_as_failure() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(source.path(), "private/q/prob.pg", "image(\"graphs/\" . $n . \".png\")");

        let copier = PrivateFileCopier::new(source.path(), 2);
        let report = copier
            .copy_all(staging.path(), &[private("private/q/prob.pg")])
            .await;

        assert_eq!(report.skipped_references, 0);
        assert_eq!(report.copied_count(), 1);
        let failures: Vec<(&Path, &str)> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Path::new("private/q/prob.pg"));
        assert!(failures[0].1.contains("unbalanced quote"));
    }

    #[tokio::test]
    async fn test_empty_reference_skipped() {
        let source = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write(source.path(), "private/q/prob.pg", "image(\"  \")");

        let copier = PrivateFileCopier::new(source.path(), 2);
        let report = copier
            .copy_all(staging.path(), &[private("private/q/prob.pg")])
            .await;

        assert_eq!(report.skipped_references, 1);
        assert_eq!(report.failure_count(), 0);
        assert_eq!(report.copied_count(), 1);
    }
}
