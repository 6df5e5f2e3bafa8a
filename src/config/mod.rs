//! Configuration management for Clinidoc.
//!
//! # Overview
//!
//! Clinidoc uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CLINIDOC_*` environment overrides
//! - Default values for every section except the clinic letterhead
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clinidoc::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinidoc.toml")?;
//! println!("Templates: {}", config.templates.dir);
//! println!("Converter: {}", config.converter.effective_strategy());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [clinic]
//! name = "University Health Services"
//! physician_in_charge = "Jose Rizal, MD"
//!
//! [storage]
//! artifact_dir = "storage/documents"
//!
//! [templates]
//! dir = "templates"
//! bp_chart_min_rows = 11
//!
//! [converter]
//! strategy = "auto"
//!
//! [converter.remote]
//! base_url = "https://v2.convertapi.com"
//! api_key = "${CLINIDOC_CONVERT_API_KEY}"
//! timeout_seconds = 60
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ClinicConfig, ClinidocConfig, ConverterConfig, ConverterStrategy,
    LoggingConfig, RemoteConverterConfig, ServerConfig, StorageConfig, TemplateConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
