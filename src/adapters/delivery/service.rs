//! Delivery of fixed-layout artifacts
//!
//! No generation logic lives here: a missing artifact is produced by the
//! pipeline synchronously, and the bytes returned always belong to the
//! requested record's identity.

use super::response::{DeliveryMode, DeliveryResponse};
use crate::core::pipeline::{CancelSignal, DocumentPipeline, PipelineOutcome};
use crate::domain::{EncounterRecord, Result, ResultExt};
use std::sync::Arc;

/// Serves records as PDF responses
#[derive(Clone)]
pub struct DocumentDelivery {
    pipeline: Arc<DocumentPipeline>,
}

impl DocumentDelivery {
    pub fn new(pipeline: Arc<DocumentPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Arc<DocumentPipeline> {
        &self.pipeline
    }

    /// Ensure the artifact exists, then read it for the given mode
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors, or an I/O error if the artifact cannot be read.
    pub async fn deliver(
        &self,
        record: &EncounterRecord,
        mode: DeliveryMode,
        cancel: &CancelSignal,
    ) -> Result<DeliveryResponse> {
        let outcome = self.pipeline.ensure_artifact(record, cancel).await?;
        let response = self.read(&outcome, mode).await?;

        tracing::info!(
            kind = %outcome.artifact.identity.kind,
            record_id = %outcome.artifact.identity.id,
            mode = %mode,
            cache_hit = outcome.cache_hit,
            bytes = response.body.len(),
            "Document delivered"
        );
        Ok(response)
    }

    async fn read(&self, outcome: &PipelineOutcome, mode: DeliveryMode) -> Result<DeliveryResponse> {
        let path = &outcome.artifact.fixed_layout;
        let body = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let identity = &outcome.artifact.identity;
        Ok(DeliveryResponse::new(identity.kind, identity.id, mode, body))
    }
}
