//! Reconvert command implementation
//!
//! Re-runs only the conversion step for records whose editable artifact
//! exists but whose print-ready artifact failed to generate.

use super::exit_code_for;
use crate::adapters::records::read_record_file;
use crate::config::load_config;
use crate::core::pipeline::DocumentPipeline;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the reconvert command
#[derive(Args, Debug)]
pub struct ReconvertArgs {
    /// Record JSON files whose documents should be reconverted
    #[arg(required = true, num_args = 1..)]
    pub records: Vec<PathBuf>,
}

impl ReconvertArgs {
    /// Execute the reconvert command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(records = self.records.len(), "Starting reconvert command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        let pipeline = match DocumentPipeline::new(&config) {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Failed to initialize document pipeline");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🔁 Reconverting with the {} converter", pipeline.converter_name());

        let mut exit_code = 0;
        for source in &self.records {
            let result = match read_record_file(source).await {
                Ok(record) => pipeline.reconvert(&record).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(outcome) => println!("✅ {}", outcome.summary()),
                Err(e) => {
                    crate::log_error_with_context!(&e, "Reconvert failed");
                    println!("❌ {}: {e}", source.display());
                    exit_code = exit_code.max(exit_code_for(&e));
                }
            }
        }
        Ok(exit_code)
    }
}
