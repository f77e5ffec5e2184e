//! Scan assets command implementation
//!
//! Prints every asset reference found in one problem file, which helps when
//! a file's images are missing from an archive.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::core::assets::{scan, AssetReference, ReferenceForm};
use crate::domain::PrivateContentPath;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the scan-assets command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Problem file to scan
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Content path of the file (e.g. private/my/abc/prob.pg) to resolve references against
    #[arg(long, value_name = "CONTENT_PATH")]
    pub content_path: Option<String>,
}

impl ScanArgs {
    /// Execute the scan-assets command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let content_path = match self.content_path.as_deref().map(PrivateContentPath::new) {
            Some(Ok(path)) => Some(path),
            Some(Err(e)) => {
                eprintln!("Invalid --content-path: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
            None => None,
        };

        let bytes = match tokio::fs::read(&self.file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", self.file.display());
                return Ok(EXIT_FATAL);
            }
        };
        let text = String::from_utf8_lossy(&bytes);

        let mut found = 0;
        for reference in scan(&text) {
            found += 1;
            println!(
                "{}",
                describe(&text, &reference, content_path.as_ref())
            );
        }

        tracing::info!(file = %self.file.display(), references = found, "Scan complete");
        println!();
        println!("{found} reference(s) in {}", self.file.display());
        Ok(EXIT_SUCCESS)
    }
}

fn describe(
    text: &str,
    reference: &AssetReference<'_>,
    content_path: Option<&PrivateContentPath>,
) -> String {
    let line = text[..reference.offset].matches('\n').count() + 1;
    let form = match reference.form {
        ReferenceForm::ImageCall => "image()",
        ReferenceForm::BareAsset => "bare",
    };

    let target = match reference.dequote() {
        Ok(path) => match content_path.map(|source| source.resolve_reference(&path)) {
            Some(Ok(resolved)) => format!("{path} -> {}", resolved.display()),
            Some(Err(e)) => format!("{path} (unresolvable: {e})"),
            None => path,
        },
        Err(e) if e.is_soft() => format!("skipped: {e}"),
        Err(e) => format!("unusable: {e}"),
    };

    format!("{line:>5}  {form:<7} {:<12} {target}", reference.quote.to_string())
}
