//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Clinidoc configuration file and the layout templates it points to.

use crate::config::{load_config, ConverterStrategy};
use crate::core::render::TemplateRegistry;
use crate::domain::FormKind;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = TemplateRegistry::new(&config.templates);
        let templates_ok = match registry.validate() {
            Ok(()) => {
                println!("✅ All {} templates present", FormKind::ALL.len());
                true
            }
            Err(e) => {
                println!("❌ Template check failed");
                println!("   Error: {e}");
                false
            }
        };

        let strategy = config.converter.effective_strategy();
        println!();
        println!("Configuration Summary:");
        println!("  Clinic: {}", config.clinic.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Templates: {}", config.templates.dir);
        println!(
            "  BP Chart Rows: {}..={}",
            config.templates.bp_chart_min_rows, config.templates.bp_chart_max_rows
        );
        println!("  Artifacts: {}", config.storage.artifact_dir);
        println!(
            "  Converter: {} (configured: {})",
            strategy, config.converter.strategy
        );
        if strategy == ConverterStrategy::Remote {
            println!("  Conversion Service: {}", config.converter.remote.base_url);
            println!(
                "  Conversion Timeout: {}s",
                config.converter.remote.timeout_seconds
            );
        }
        println!("  Server: {}", config.server.bind_address);
        println!();

        Ok(if templates_ok { 0 } else { 2 })
    }
}
