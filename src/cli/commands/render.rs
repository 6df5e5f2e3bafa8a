//! Render command implementation
//!
//! This module implements the `render` command: one or more exported
//! record files are taken through the document pipeline concurrently.

use super::exit_code_for;
use crate::adapters::delivery::{DeliveryMode, DocumentDelivery};
use crate::adapters::records::read_record_file;
use crate::config::load_config;
use crate::core::pipeline::{CancelSignal, DocumentPipeline};
use crate::domain::{Result, ResultExt};
use clap::Args;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Record JSON files to render
    #[arg(required = true, num_args = 1..)]
    pub records: Vec<PathBuf>,

    /// Delivery mode (inline, print or download)
    #[arg(short, long, default_value = "inline")]
    pub mode: String,

    /// Copy each delivered document into this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum records rendered at the same time
    #[arg(short, long, default_value_t = 4)]
    pub jobs: usize,
}

/// What happened to one record file
#[derive(Debug)]
struct RenderReport {
    source: PathBuf,
    result: Result<String>,
}

impl RenderArgs {
    /// Execute the render command
    pub async fn execute(&self, config_path: &str, cancel: CancelSignal) -> anyhow::Result<i32> {
        tracing::info!(records = self.records.len(), mode = %self.mode, "Starting render command");

        let mode = match self.mode.parse::<DeliveryMode>() {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

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
        let delivery = DocumentDelivery::new(Arc::new(pipeline));

        if let Some(output) = &self.output {
            tokio::fs::create_dir_all(output).await?;
        }

        println!(
            "🖨️  Rendering {} record(s) with the {} converter",
            self.records.len(),
            delivery.pipeline().converter_name()
        );
        println!();

        let reports: Vec<RenderReport> = stream::iter(self.records.iter().cloned())
            .map(|source| {
                let delivery = delivery.clone();
                let cancel = cancel.clone();
                let output = self.output.clone();
                async move {
                    let result =
                        render_one(&delivery, &source, mode, output.as_deref(), &cancel).await;
                    RenderReport { source, result }
                }
            })
            .buffer_unordered(self.jobs.max(1))
            .collect()
            .await;

        let mut exit_code = 0;
        for report in &reports {
            match &report.result {
                Ok(line) => println!("✅ {}: {line}", report.source.display()),
                Err(e) => {
                    crate::log_error_with_context!(e, "Render failed");
                    println!("❌ {}: {e}", report.source.display());
                    exit_code = exit_code.max(exit_code_for(e));
                }
            }
        }

        let failed = reports.iter().filter(|r| r.result.is_err()).count();
        println!();
        println!(
            "📊 Rendered {} of {} record(s)",
            reports.len() - failed,
            reports.len()
        );
        Ok(exit_code)
    }
}

async fn render_one(
    delivery: &DocumentDelivery,
    source: &Path,
    mode: DeliveryMode,
    output: Option<&Path>,
    cancel: &CancelSignal,
) -> Result<String> {
    let record = read_record_file(source).await?;
    let response = delivery.deliver(&record, mode, cancel).await?;
    let (_, paths) = delivery.pipeline().paths_for(&record)?;

    let mut line = paths.fixed_layout.display().to_string();
    if let Some(dir) = output {
        let target = dir.join(&response.filename);
        tokio::fs::write(&target, &response.body)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
        line = format!("{line} -> {}", target.display());
    }
    if response.print {
        line.push_str(" [print on load]");
    }
    Ok(line)
}
