//! Serve command implementation
//!
//! Exposes the delivery router over HTTP until a shutdown signal arrives.

use super::exit_code_for;
use crate::adapters::delivery::{router, AppState, DocumentDelivery};
use crate::adapters::records::JsonRecordSource;
use crate::config::load_config;
use crate::core::pipeline::DocumentPipeline;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override server.bind_address
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
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
        if let Err(e) = pipeline.registry().validate() {
            println!("❌ Template check failed");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }

        let converter = pipeline.converter_name();
        let delivery = DocumentDelivery::new(Arc::new(pipeline));
        let records = Arc::new(JsonRecordSource::new(&config.server.records_dir));
        let app = router(AppState::new(delivery, records));

        let bind = self.bind.as_deref().unwrap_or(&config.server.bind_address);
        let listener = match tokio::net::TcpListener::bind(bind).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, bind = %bind, "Failed to bind");
                println!("❌ Failed to bind {bind}: {e}");
                return Ok(5);
            }
        };

        tracing::info!(
            bind = %bind,
            converter,
            records_dir = %config.server.records_dir,
            "Delivery server listening"
        );
        println!("🌐 Serving documents on http://{bind} ({converter} converter)");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // Sender dropped also means shutdown
                let _ = shutdown_signal.wait_for(|stop| *stop).await;
                tracing::info!("Delivery server shutting down");
            })
            .await?;

        println!("👋 Server stopped");
        Ok(0)
    }
}
