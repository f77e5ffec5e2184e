//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code: completed without problems
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code: archive produced, but some private files are missing from it
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code: configuration or usage error
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code: the export was aborted
pub const EXIT_FATAL: i32 = 5;

/// Course export - package a course and its private problem files
#[derive(Parser, Debug)]
#[command(name = "course-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "course-export.toml",
        env = "COURSE_EXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COURSE_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a course into a .tgz archive
    Export(commands::export::ExportArgs),

    /// List the asset references found in a problem file
    ScanAssets(commands::scan::ScanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_export_file() {
        let cli = Cli::parse_from(["course-export", "export", "--course", "course.json"]);
        assert_eq!(cli.config, "course-export.toml");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.course, Some(PathBuf::from("course.json")));
                assert!(args.course_id.is_none());
                assert!(!args.keep_temp);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_by_id() {
        let cli = Cli::parse_from([
            "course-export",
            "export",
            "--course-id",
            "42",
            "--output",
            "out",
            "--keep-temp",
        ]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.course_id, Some(42));
                assert_eq!(args.output, Some(PathBuf::from("out")));
                assert!(args.keep_temp);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_export_requires_one_input() {
        assert!(Cli::try_parse_from(["course-export", "export"]).is_err());
        assert!(Cli::try_parse_from([
            "course-export",
            "export",
            "--course",
            "a.json",
            "--course-id",
            "1"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["course-export", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["course-export", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_scan_assets() {
        let cli = Cli::parse_from(["course-export", "scan-assets", "prob.pg"]);
        match cli.command {
            Commands::ScanAssets(args) => assert_eq!(args.file, PathBuf::from("prob.pg")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
