//! Invalidate command implementation
//!
//! Deletes every stored artifact for a record so that the next request
//! regenerates it from current data.

use super::exit_code_for;
use crate::adapters::records::read_record_file;
use crate::config::load_config;
use crate::core::pipeline::DocumentPipeline;
use crate::domain::{FormKind, RecordId};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the invalidate command
#[derive(Args, Debug)]
pub struct InvalidateArgs {
    /// Record JSON file whose artifacts should be removed
    #[arg(conflicts_with_all = ["kind", "id"], required_unless_present_all = ["kind", "id"])]
    pub record: Option<PathBuf>,

    /// Form kind (e.g. bp_chart, incident_report)
    #[arg(long, requires = "id")]
    pub kind: Option<FormKind>,

    /// Record id
    #[arg(long, requires = "kind")]
    pub id: Option<RecordId>,
}

impl InvalidateArgs {
    /// Execute the invalidate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
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

        let result = match (&self.record, self.kind, self.id) {
            (Some(source), _, _) => match read_record_file(source).await {
                Ok(record) => pipeline.invalidate(&record).await,
                Err(e) => Err(e),
            },
            (None, Some(kind), Some(id)) => pipeline.invalidate_id(kind, id).await,
            _ => {
                println!("❌ Provide a record file or both --kind and --id");
                return Ok(2);
            }
        };

        match result {
            Ok(removed) => {
                tracing::info!(removed, "Artifacts invalidated");
                println!("🗑️  Removed {removed} artifact(s)");
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Invalidate failed");
                println!("❌ Failed to invalidate artifacts");
                println!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
