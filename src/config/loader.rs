//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CourseExportConfig;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "COURSE_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CourseExportConfig
/// 4. Applies environment variable overrides (COURSE_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use course_export::config::loader::load_config;
///
/// let config = load_config("course-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CourseExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Same as [`load_config`] for an in-memory document
pub fn load_config_from_str(contents: &str) -> Result<CourseExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CourseExportConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    if config.is_production() && !config.export.auto_delete_temp {
        tracing::warn!(
            "Running in production without export.auto_delete_temp; staging directories will accumulate"
        );
    }

    Ok(config)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern must compile")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| {
        ExportError::Configuration(format!(
            "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
        ))
    })
}

/// Applies environment variable overrides using the COURSE_EXPORT_* prefix
///
/// Environment variables follow the pattern `COURSE_EXPORT_<SECTION>_<KEY>`,
/// for example `COURSE_EXPORT_PATHS_WEBWORK_FILE_LOCATION`. The environment
/// itself is `COURSE_EXPORT_ENVIRONMENT`.
fn apply_env_overrides(config: &mut CourseExportConfig) -> Result<()> {
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT")) {
        config.environment = val.parse().map_err(ExportError::Configuration)?;
    }

    // Application overrides
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("APPLICATION", "CONFIG_SALT") {
        config.application.config_salt = val;
    }

    // Path overrides
    if let Some(val) = env_override("PATHS", "WORKING_TEMP_DIRECTORY") {
        config.paths.working_temp_directory = PathBuf::from(val);
    }
    if let Some(val) = env_override("PATHS", "WEBWORK_FILE_LOCATION") {
        config.paths.webwork_file_location = PathBuf::from(val);
    }
    if let Some(val) = env_override("PATHS", "COURSE_DIRECTORY") {
        config.paths.course_directory = Some(PathBuf::from(val));
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT", "AUTO_DELETE_TEMP") {
        config.export.auto_delete_temp = parse_override("EXPORT", "AUTO_DELETE_TEMP", &val)?;
    }
    if let Some(val) = env_override("EXPORT", "MAX_CONCURRENT_COPIES") {
        config.export.max_concurrent_copies =
            parse_override("EXPORT", "MAX_CONCURRENT_COPIES", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING", "LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("COURSE_EXPORT_TEST_ROOT", "/srv/webwork");
        let input = "webwork_file_location = \"${COURSE_EXPORT_TEST_ROOT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "webwork_file_location = \"/srv/webwork\"\n");
        std::env::remove_var("COURSE_EXPORT_TEST_ROOT");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("COURSE_EXPORT_TEST_MISSING");
        let input = "working_temp_directory = \"${COURSE_EXPORT_TEST_MISSING}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("COURSE_EXPORT_TEST_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# path = \"${COURSE_EXPORT_TEST_NEVER_SET}\"\n";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(ExportError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
environment = "staging"

[application]
log_level = "debug"

[paths]
working_temp_directory = "/var/tmp/course-export"
webwork_file_location = "/srv/webwork"
course_directory = "/srv/courses"

[export]
auto_delete_temp = false
max_concurrent_copies = 8
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(
            config.paths.course_directory,
            Some(PathBuf::from("/srv/courses"))
        );
        assert!(!config.export.auto_delete_temp);
        assert_eq!(config.export.max_concurrent_copies, 8);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let toml_content = r#"
[paths]
webwork_file_location = "/srv/webwork"

[export]
max_concurrent_copies = 0
"#;
        let err = load_config_from_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("max_concurrent_copies"));
    }
}
