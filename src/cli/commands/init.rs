//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "course-export.toml")]
    pub output: String,

    /// Include commented explanations for every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing course export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point paths.webwork_file_location at your WeBWorK content root");
                println!("  2. Validate configuration: course-export validate-config");
                println!("  3. Run export: course-export export --course course.json");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Course Export Configuration File

environment = "development"

[application]
log_level = "info"

[paths]
working_temp_directory = "tmp"
webwork_file_location = "${WEBWORK_ROOT}"
# course_directory = "courses"

[export]
auto_delete_temp = true
max_concurrent_copies = 32

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Course Export Configuration File
#
# Values may reference environment variables as ${VAR}. Any key can also be
# overridden with COURSE_EXPORT_<SECTION>_<KEY>, for example
# COURSE_EXPORT_EXPORT_AUTO_DELETE_TEMP=false.

# development | staging | production
environment = "development"

[application]
# trace | debug | info | warn | error
log_level = "info"
# Mixed into the configuration fingerprint printed by validate-config
# config_salt = "${COURSE_EXPORT_CONFIG_SALT}"

[paths]
# Staging area. Each export works in <working_temp_directory>/<course id>/
working_temp_directory = "tmp"

# Root that private/... content paths are resolved against
webwork_file_location = "/opt/webwork/libraries"

# Directory holding <course id>.json documents, used by export --course-id
# course_directory = "/var/lib/course-export/courses"

[export]
# Remove the staging directory once the archive has been delivered
auto_delete_temp = true

# Upper bound on private files copied at the same time (1-1024)
max_concurrent_copies = 32

[logging]
# Write JSON logs to files in addition to the console
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "course-export.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "course-export.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_load() {
        std::env::set_var("WEBWORK_ROOT", "/opt/webwork");
        let minimal = load_config_from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(
            minimal.paths.webwork_file_location,
            std::path::PathBuf::from("/opt/webwork")
        );

        let full = load_config_from_str(&InitArgs::generate_config_with_examples()).unwrap();
        assert_eq!(full.export.max_concurrent_copies, 32);
        assert!(full.export.auto_delete_temp);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("course-export.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().await.unwrap(), EXIT_SUCCESS);
        assert!(fs::read_to_string(&output).unwrap().contains("[paths]"));
    }
}
