//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also require the content and course directories to exist
    #[arg(long)]
    pub check_paths: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates as well
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Working Temp Directory: {}",
            config.paths.working_temp_directory.display()
        );
        println!(
            "  WeBWorK File Location: {}",
            config.paths.webwork_file_location.display()
        );
        match &config.paths.course_directory {
            Some(dir) => println!("  Course Directory: {}", dir.display()),
            None => println!("  Course Directory: (not set, --course-id unavailable)"),
        }
        println!("  Auto Delete Temp: {}", config.export.auto_delete_temp);
        println!(
            "  Max Concurrent Copies: {}",
            config.export.max_concurrent_copies
        );
        println!("  Fingerprint: {}", config.fingerprint());
        println!();

        if config.is_production() && !config.export.auto_delete_temp {
            println!("⚠️  auto_delete_temp is disabled in production");
            println!();
        }

        if self.check_paths {
            let mut missing = Vec::new();
            if !config.paths.webwork_file_location.is_dir() {
                missing.push(config.paths.webwork_file_location.clone());
            }
            if let Some(dir) = &config.paths.course_directory {
                if !dir.is_dir() {
                    missing.push(dir.clone());
                }
            }
            if !missing.is_empty() {
                for path in &missing {
                    println!("❌ Directory not found: {}", path.display());
                }
                return Ok(EXIT_CONFIG_ERROR);
            }
            println!("✅ Configured directories exist");
        }

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = ValidateArgs { check_paths: false };
        let code = args.execute("missing-course-export.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_validate_check_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[paths]\nwebwork_file_location = \"{}\"",
            dir.path().display()
        )
        .unwrap();

        let args = ValidateArgs { check_paths: true };
        let path = file.path().to_string_lossy().to_string();
        assert_eq!(args.execute(&path).await.unwrap(), EXIT_SUCCESS);
    }
}
