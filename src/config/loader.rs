//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ClinidocConfig, ConverterStrategy};
use super::secret::secret_string;
use crate::domain::errors::ClinidocError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ClinidocConfig
/// 4. Applies environment variable overrides (CLINIDOC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ClinidocError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use clinidoc::config::loader::load_config;
///
/// let config = load_config("clinidoc.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClinidocConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClinidocError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ClinidocError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text (substitution, overrides and validation included)
pub fn parse_config(contents: &str) -> Result<ClinidocConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ClinidocConfig = toml::from_str(&contents)
        .map_err(|e| ClinidocError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ClinidocError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Template placeholders such as
/// `${name}` never appear in configuration, so only upper-case names match.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ClinidocError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ClinidocError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using CLINIDOC_* prefix
///
/// Environment variables follow the pattern: CLINIDOC_<SECTION>_<KEY>
/// For example: CLINIDOC_STORAGE_ARTIFACT_DIR, CLINIDOC_CONVERTER_STRATEGY
fn apply_env_overrides(config: &mut ClinidocConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CLINIDOC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CLINIDOC_STORAGE_ARTIFACT_DIR") {
        config.storage.artifact_dir = val;
    }

    if let Ok(val) = std::env::var("CLINIDOC_TEMPLATES_DIR") {
        config.templates.dir = val;
    }
    if let Ok(val) = std::env::var("CLINIDOC_TEMPLATES_BP_CHART_MIN_ROWS") {
        if let Ok(rows) = val.parse() {
            config.templates.bp_chart_min_rows = rows;
        }
    }

    if let Ok(val) = std::env::var("CLINIDOC_CONVERTER_STRATEGY") {
        config.converter.strategy = match val.to_lowercase().as_str() {
            "remote" => ConverterStrategy::Remote,
            "local" => ConverterStrategy::Local,
            "auto" => ConverterStrategy::Auto,
            other => {
                return Err(ClinidocError::Configuration(format!(
                    "Invalid CLINIDOC_CONVERTER_STRATEGY '{other}'. Must be one of: remote, local, auto"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("CLINIDOC_CONVERTER_REMOTE_BASE_URL") {
        config.converter.remote.base_url = val;
    }
    if let Ok(val) = std::env::var("CLINIDOC_CONVERTER_REMOTE_API_KEY") {
        config.converter.remote.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("CLINIDOC_CONVERTER_REMOTE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.converter.remote.timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("CLINIDOC_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Ok(val) = std::env::var("CLINIDOC_SERVER_RECORDS_DIR") {
        config.server.records_dir = val;
    }

    if let Ok(val) = std::env::var("CLINIDOC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINIDOC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
