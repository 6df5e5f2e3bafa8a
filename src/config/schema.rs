//! Configuration schema types
//!
//! This module defines the configuration structure for Clinidoc. Every
//! section except `[clinic]` has defaults so a minimal file only needs the
//! clinic letterhead.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Format converter strategy selection
///
/// `Auto` is resolved once, at construction time: remote when an API key is
/// configured, local otherwise. A failing remote call never falls back to the
/// local writer at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConverterStrategy {
    /// Remote document-conversion service
    Remote,
    /// In-process reader/writer
    Local,
    /// Remote if a credential is present, else local
    #[default]
    Auto,
}

impl std::fmt::Display for ConverterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConverterStrategy::Remote => f.write_str("remote"),
            ConverterStrategy::Local => f.write_str("local"),
            ConverterStrategy::Auto => f.write_str("auto"),
        }
    }
}

/// Main Clinidoc configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinidocConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Where generated artifacts live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Layout template location and row capacities
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Fixed-layout conversion
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Clinic letterhead printed on every form
    pub clinic: ClinicConfig,

    /// HTTP delivery surface
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClinidocConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.templates.validate()?;
        self.converter.validate()?;
        self.clinic.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
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

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding editable and fixed-layout artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.artifact_dir.trim().is_empty() {
            return Err("storage.artifact_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Layout template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Directory holding one `.fodt` layout per form kind
    #[serde(default = "default_template_dir")]
    pub dir: String,

    /// Blank-padded minimum of reading rows on the blood-pressure chart
    #[serde(default = "default_bp_min_rows")]
    pub bp_chart_min_rows: usize,

    /// Reading rows the blood-pressure chart page can hold
    #[serde(default = "default_bp_max_rows")]
    pub bp_chart_max_rows: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            bp_chart_min_rows: default_bp_min_rows(),
            bp_chart_max_rows: default_bp_max_rows(),
        }
    }
}

impl TemplateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.dir.trim().is_empty() {
            return Err("templates.dir cannot be empty".to_string());
        }
        if self.bp_chart_min_rows == 0 {
            return Err("templates.bp_chart_min_rows must be > 0".to_string());
        }
        if self.bp_chart_max_rows < self.bp_chart_min_rows {
            return Err(format!(
                "templates.bp_chart_max_rows ({}) must be >= bp_chart_min_rows ({})",
                self.bp_chart_max_rows, self.bp_chart_min_rows
            ));
        }
        Ok(())
    }
}

/// Format converter configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConverterConfig {
    /// remote | local | auto
    #[serde(default)]
    pub strategy: ConverterStrategy,

    /// Remote conversion service settings
    #[serde(default)]
    pub remote: RemoteConverterConfig,
}

impl ConverterConfig {
    fn validate(&self) -> Result<(), String> {
        match self.strategy {
            ConverterStrategy::Remote => self.remote.validate(true),
            ConverterStrategy::Auto if self.remote.api_key.is_some() => {
                self.remote.validate(true)
            }
            _ => Ok(()),
        }
    }

    /// The strategy actually used once `Auto` is resolved
    pub fn effective_strategy(&self) -> ConverterStrategy {
        match self.strategy {
            ConverterStrategy::Auto => {
                if self.remote.has_credential() {
                    ConverterStrategy::Remote
                } else {
                    ConverterStrategy::Local
                }
            }
            other => other,
        }
    }
}

/// Remote document-conversion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConverterConfig {
    /// Base URL of the conversion service
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// API credential
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable against a local development service.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl Default for RemoteConverterConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_base_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

impl RemoteConverterConfig {
    /// Whether a non-empty API key is configured
    pub fn has_credential(&self) -> bool {
        use secrecy::ExposeSecret;
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    fn validate(&self, required: bool) -> Result<(), String> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("converter.remote.base_url is not a valid URL: {e}"))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("converter.remote.base_url must start with http:// or https://".to_string());
        }
        if required && !self.has_credential() {
            return Err(
                "converter.remote.api_key is required when strategy = 'remote'".to_string(),
            );
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err("converter.remote.timeout_seconds must be between 1 and 600".to_string());
        }
        Ok(())
    }
}

/// Clinic letterhead and physician-in-charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    /// Clinic name printed in the form header
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub contact_number: Option<String>,

    /// Physician who countersigns certificates
    #[serde(default)]
    pub physician_in_charge: Option<String>,

    #[serde(default)]
    pub physician_license: Option<String>,
}

impl ClinicConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("clinic.name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// HTTP delivery server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:8088"
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Directory of exported record JSON files served by `serve`
    #[serde(default = "default_records_dir")]
    pub records_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            records_dir: default_records_dir(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.bind_address
            .parse::<std::net::SocketAddr>()
            .map_err(|e| format!("server.bind_address '{}' is invalid: {e}", self.bind_address))?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
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
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
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

fn default_artifact_dir() -> String {
    "storage/documents".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_bp_min_rows() -> usize {
    11
}

fn default_bp_max_rows() -> usize {
    31
}

fn default_remote_base_url() -> String {
    "https://v2.convertapi.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1:8088".to_string()
}

fn default_records_dir() -> String {
    "storage/records".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
