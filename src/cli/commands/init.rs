//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "clinidoc.toml")]
    pub output: String,

    /// Include example values and comments
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

        println!("📝 Initializing Clinidoc configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
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
                println!("  1. Edit {} with your clinic letterhead", self.output);
                println!("  2. Copy the layout templates into the templates directory");
                println!("  3. Optional: set CLINIDOC_CONVERT_API_KEY in .env for remote conversion");
                println!("  4. Validate configuration: clinidoc validate-config");
                println!("  5. Render a record: clinidoc render path/to/record.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Clinidoc Configuration File
# Clinical document rendering pipeline

[application]
log_level = "info"

[clinic]
name = "University Health Services"
physician_in_charge = "Jose Rizal, MD"
physician_license = "0012345"

[storage]
artifact_dir = "storage/documents"

[templates]
dir = "templates"
bp_chart_min_rows = 11
bp_chart_max_rows = 31

[converter]
strategy = "local"

[server]
bind_address = "127.0.0.1:8088"
records_dir = "storage/records"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Clinidoc Configuration File
# Clinical document rendering pipeline
#
# Turns exported encounter records into an editable document and a
# print-ready PDF, and serves them over HTTP.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Clinic Letterhead
# ============================================================================
[clinic]
# Printed in the header of every form (required)
name = "University Health Services"
address = "Student Center, 2nd Floor"
contact_number = "(02) 8123 4567"

# Countersigns certificates when no signatory is recorded
physician_in_charge = "Jose Rizal, MD"
physician_license = "0012345"

# ============================================================================
# Artifact Storage
# ============================================================================
[storage]
# Editable (.fodt) and print-ready (.pdf) artifacts are written here.
# File names are derived from the record, so an existing file is reused.
artifact_dir = "storage/documents"

# ============================================================================
# Layout Templates
# ============================================================================
[templates]
# One .fodt layout per form kind
dir = "templates"

# Blood-pressure chart rows: blank-padded minimum and page capacity
bp_chart_min_rows = 11
bp_chart_max_rows = 31

# ============================================================================
# Format Converter
# ============================================================================
[converter]
# remote | local | auto
# - remote: send the editable document to the conversion service
# - local: in-process PDF writer
# - auto: remote when an api_key is set, local otherwise
strategy = "auto"

[converter.remote]
base_url = "https://v2.convertapi.com"

# API credential (use environment variable)
# api_key = "${CLINIDOC_CONVERT_API_KEY}"

# Whole-request timeout in seconds
timeout_seconds = 60

# TLS certificate verification
tls_verify = true

# ============================================================================
# HTTP Delivery
# ============================================================================
[server]
bind_address = "127.0.0.1:8088"

# Exported records, named {kind}_{id}.json
records_dir = "storage/records"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config_parses() {
        let config = parse_config(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(config.clinic.name, "University Health Services");
        assert_eq!(config.templates.bp_chart_min_rows, 11);
    }

    #[test]
    fn test_generate_config_with_examples_parses() {
        let content = InitArgs::generate_config_with_examples();
        assert!(content.contains("# Clinidoc Configuration File"));
        assert!(content.contains("[converter.remote]"));
        parse_config(&content).unwrap();
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("clinidoc.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_force_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("clinidoc.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[clinic]"));
    }
}
