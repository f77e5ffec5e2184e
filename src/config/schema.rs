//! Configuration schema types
//!
//! This module defines the configuration structure that maps to
//! `course-export.toml`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "Invalid environment '{other}'. Must be one of: development, staging, production"
            )),
        }
    }
}

/// Main course export configuration
///
/// This is the root configuration structure that maps to the TOML file. It is
/// passed explicitly to the exporter; nothing reads configuration globally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Filesystem locations
    pub paths: PathsConfig,

    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourseExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.paths.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Whether the configuration targets production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// SHA-256 of the effective configuration, hex encoded
    ///
    /// Two runs with the same fingerprint used the same settings. The
    /// application salt is part of the hashed document.
    pub fn fingerprint(&self) -> String {
        let serialized = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&serialized);
        format!("{digest:x}")
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Mixed into the configuration fingerprint
    #[serde(default)]
    pub config_salt: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            config_salt: String::new(),
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root under which per-course staging directories are created
    #[serde(default = "default_working_temp_directory")]
    pub working_temp_directory: PathBuf,

    /// Content root that private problem paths are relative to
    pub webwork_file_location: PathBuf,

    /// Directory of `<course id>.json` documents for exports by id
    #[serde(default)]
    pub course_directory: Option<PathBuf>,
}

impl PathsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.working_temp_directory.as_os_str().is_empty() {
            return Err("paths.working_temp_directory cannot be empty".to_string());
        }
        if self.webwork_file_location.as_os_str().is_empty() {
            return Err("paths.webwork_file_location cannot be empty".to_string());
        }
        if let Some(dir) = &self.course_directory {
            if dir.as_os_str().is_empty() {
                return Err("paths.course_directory cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            working_temp_directory: default_working_temp_directory(),
            webwork_file_location: PathBuf::from("webwork-files"),
            course_directory: None,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Remove the staging directory once the archive has been handed over
    #[serde(default = "default_true")]
    pub auto_delete_temp: bool,

    /// Upper bound on concurrent file operations while copying
    #[serde(default = "default_max_concurrent_copies")]
    pub max_concurrent_copies: usize,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_copies == 0 || self.max_concurrent_copies > 1024 {
            return Err("export.max_concurrent_copies must be between 1 and 1024".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            auto_delete_temp: true,
            max_concurrent_copies: default_max_concurrent_copies(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_working_temp_directory() -> PathBuf {
    PathBuf::from("tmp")
}

fn default_max_concurrent_copies() -> usize {
    32
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
[paths]
webwork_file_location = "/srv/webwork"
"#
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.paths.working_temp_directory, PathBuf::from("tmp"));
        assert_eq!(config.paths.webwork_file_location, PathBuf::from("/srv/webwork"));
        assert!(config.paths.course_directory.is_none());
        assert!(config.export.auto_delete_temp);
        assert_eq!(config.export.max_concurrent_copies, 32);
        assert!(!config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_section_required() {
        let result = toml::from_str::<CourseExportConfig>("[export]\nauto_delete_temp = false\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();
        config.application.log_level = "verbose".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();
        config.export.max_concurrent_copies = 0;
        assert!(config.validate().is_err());

        config.export.max_concurrent_copies = 4096;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_fingerprint_tracks_settings() {
        let config: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();
        let same: CourseExportConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.fingerprint(), same.fingerprint());
        assert_eq!(config.fingerprint().len(), 64);

        let mut salted = config.clone();
        salted.application.config_salt = "pepper".to_string();
        assert_ne!(config.fingerprint(), salted.fingerprint());
    }
}
