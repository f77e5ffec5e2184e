//! Gzip-compressed tar packaging of a staged content directory

use crate::domain::{ExportError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extension of produced archives
pub const ARCHIVE_EXTENSION: &str = "tgz";

/// Packs `content_dir` into `<parent>/<name>.tgz`
///
/// The directory becomes the single top-level entry of the archive. The
/// returned path is absolute and only handed out once the gzip stream has
/// been finished and the file synced to disk.
///
/// # Errors
///
/// Returns [`ExportError::Archive`] for any failure while building, writing
/// or closing the stream. No partial archive is reported as success.
pub async fn archive_directory(content_dir: &Path) -> Result<PathBuf> {
    let content_dir = content_dir.to_path_buf();
    tokio::task::spawn_blocking(move || build_archive(&content_dir))
        .await
        .map_err(|e| ExportError::Archive(format!("Archive task failed: {e}")))?
}

fn build_archive(content_dir: &Path) -> Result<PathBuf> {
    let name = content_dir
        .file_name()
        .ok_or_else(|| {
            ExportError::Archive(format!(
                "Cannot archive {} without a directory name",
                content_dir.display()
            ))
        })?
        .to_os_string();
    let parent = content_dir.parent().unwrap_or_else(|| Path::new("."));

    let mut file_name = name.clone();
    file_name.push(format!(".{ARCHIVE_EXTENSION}"));
    let archive_path = parent.join(file_name);

    if let Err(e) = write_archive(&archive_path, &name, content_dir) {
        // Never leave a truncated archive next to the content directory.
        let _ = std::fs::remove_file(&archive_path);
        return Err(ExportError::Archive(format!("{}: {e}", archive_path.display())));
    }

    let archive_path = archive_path
        .canonicalize()
        .map_err(|e| ExportError::Archive(format!("{}: {e}", archive_path.display())))?;
    tracing::info!(path = %archive_path.display(), "Archive written");
    Ok(archive_path)
}

fn write_archive(archive_path: &Path, name: &OsStr, content_dir: &Path) -> std::io::Result<()> {
    let file = File::create(archive_path)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.follow_symlinks(false);
    builder.append_dir_all(name, content_dir)?;

    let file = builder.into_inner()?.finish()?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_archive_single_top_level_entry() {
        let temp = TempDir::new().unwrap();
        let content = temp.path().join("Algebra");
        std::fs::create_dir_all(content.join("units/U1")).unwrap();
        std::fs::write(content.join("units/U1/setT1.def"), "def").unwrap();

        let archive = archive_directory(&content).await.unwrap();

        assert!(archive.is_absolute());
        assert_eq!(archive.file_name().unwrap(), "Algebra.tgz");

        let mut reader = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
        let entries: Vec<PathBuf> = reader
            .entries()
            .unwrap()
            .map(|entry| entry.unwrap().path().unwrap().into_owned())
            .collect();
        assert!(entries.iter().all(|p| p.starts_with("Algebra")));
        assert!(entries.contains(&PathBuf::from("Algebra/units/U1/setT1.def")));
    }

    #[tokio::test]
    async fn test_archive_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = archive_directory(&temp.path().join("missing")).await;

        assert!(matches!(result, Err(ExportError::Archive(_))));
        assert!(!temp.path().join("missing.tgz").exists());
    }
}
