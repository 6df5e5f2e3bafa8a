//! Document pipeline coordinator
//!
//! Drives one record through cache check → map → expand → render →
//! convert → verify → cache put. Every form kind goes through the same
//! path; kind-specific behaviour lives in the mapping tables and the
//! template registry.

use super::cancel::{check, CancelSignal};
use super::outcome::PipelineOutcome;
use crate::adapters::convert::{create_converter, verify_output, DocumentConverter};
use crate::config::ClinidocConfig;
use crate::core::cache::atomic::is_temp_path;
use crate::core::cache::{
    is_ready, ArtifactCache, ArtifactPaths, FsArtifactCache, RecordGates, SingleFlight,
};
use crate::core::mapping::{map_record, repeating_items, ClinicProfile, MappingContext};
use crate::core::render::{TemplateRegistry, TemplateRenderer};
use crate::domain::{
    ArtifactIdentity, ClinidocError, EncounterRecord, FormKind, GeneratedArtifact, RecordId,
    Result,
};
use crate::{log_cache_hit, log_render_start, log_stage_complete};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Generic document generation engine
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
///
/// # Example
///
/// ```rust,no_run
/// use clinidoc::config::load_config;
/// use clinidoc::core::pipeline::{never_cancelled, DocumentPipeline};
/// use clinidoc::domain::EncounterRecord;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("clinidoc.toml")?;
/// let pipeline = DocumentPipeline::new(&config)?;
///
/// let record = EncounterRecord::from_json(&std::fs::read_to_string("record.json")?)?;
/// let outcome = pipeline.ensure_artifact(&record, &never_cancelled()).await?;
/// println!("{}", outcome.artifact.fixed_layout.display());
/// # Ok(())
/// # }
/// ```
pub struct DocumentPipeline {
    registry: TemplateRegistry,
    renderer: TemplateRenderer,
    artifact_dir: PathBuf,
    cache: Arc<dyn ArtifactCache>,
    converter: Arc<dyn DocumentConverter>,
    flights: SingleFlight,
    records: RecordGates,
    clinic: ClinicProfile,
    fixed_today: Option<NaiveDate>,
}

impl DocumentPipeline {
    /// Build the pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured converter cannot be constructed.
    pub fn new(config: &ClinidocConfig) -> Result<Self> {
        let artifact_dir = PathBuf::from(&config.storage.artifact_dir);
        Self::with_parts(
            TemplateRegistry::new(&config.templates),
            artifact_dir.clone(),
            Arc::new(FsArtifactCache::new(artifact_dir)),
            create_converter(&config.converter)?,
            ClinicProfile::from(&config.clinic),
        )
    }

    /// Assemble a pipeline from explicit parts
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer cannot be constructed.
    pub fn with_parts(
        registry: TemplateRegistry,
        artifact_dir: PathBuf,
        cache: Arc<dyn ArtifactCache>,
        converter: Arc<dyn DocumentConverter>,
        clinic: ClinicProfile,
    ) -> Result<Self> {
        let renderer = TemplateRenderer::new(registry.dir())?;
        Ok(Self {
            registry,
            renderer,
            artifact_dir,
            cache,
            converter,
            flights: SingleFlight::new(),
            records: RecordGates::new(),
            clinic,
            fixed_today: None,
        })
    }

    /// Pin "today" for age calculation
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn converter_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Deterministic paths for a record
    ///
    /// # Errors
    ///
    /// Returns an input error if the identity triplet is incomplete.
    pub fn paths_for(&self, record: &EncounterRecord) -> Result<(ArtifactIdentity, ArtifactPaths)> {
        let identity = record.identity()?;
        let paths = ArtifactPaths::resolve(&self.artifact_dir, &identity);
        Ok((identity, paths))
    }

    /// Return the record's fixed-layout artifact, generating it if needed
    ///
    /// A cache hit skips mapping, rendering and conversion entirely. On a
    /// miss at most one generation per path runs in this process; concurrent
    /// callers wait and then reuse its result.
    ///
    /// # Errors
    ///
    /// Input, configuration, render, conversion or cancellation errors. A
    /// conversion failure leaves the editable artifact in place so that
    /// [`reconvert`](Self::reconvert) can retry conversion alone.
    pub async fn ensure_artifact(
        &self,
        record: &EncounterRecord,
        cancel: &CancelSignal,
    ) -> Result<PipelineOutcome> {
        let started = Instant::now();
        let (identity, paths) = self.paths_for(record)?;

        if let Some(outcome) = self.cached(&identity, &paths, started).await {
            return Ok(outcome);
        }
        check(cancel, "single_flight")?;

        let _record = self.records.generating(identity.kind, identity.id).await;
        let _flight = self.flights.acquire(&paths.fixed_layout).await;

        // Another caller may have finished while we waited
        if let Some(outcome) = self.cached(&identity, &paths, started).await {
            return Ok(outcome);
        }

        log_render_start!(identity.kind, identity.id);
        let result = self.generate(record, &identity, &paths, cancel).await;
        if result.is_err() {
            remove_temps(&paths).await;
        }
        let rendered = result?;

        let outcome = PipelineOutcome {
            artifact: artifact(identity, paths),
            cache_hit: false,
            rendered,
            duration: started.elapsed(),
        };
        tracing::info!(
            kind = %outcome.artifact.identity.kind,
            record_id = %outcome.artifact.identity.id,
            path = %outcome.artifact.fixed_layout.display(),
            converter = self.converter.name(),
            duration_ms = outcome.duration.as_millis() as u64,
            "Document generated"
        );
        Ok(outcome)
    }

    /// Re-run only the conversion step from an existing editable artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the editable artifact is absent or conversion fails.
    pub async fn reconvert(&self, record: &EncounterRecord) -> Result<PipelineOutcome> {
        let started = Instant::now();
        let (identity, paths) = self.paths_for(record)?;
        let _record = self.records.generating(identity.kind, identity.id).await;
        let _flight = self.flights.acquire(&paths.fixed_layout).await;

        if !is_ready(&paths.editable).await {
            return Err(ClinidocError::Io(format!(
                "No editable artifact at {}; render the record first",
                paths.editable.display()
            )));
        }

        let result = self.convert(&identity, &paths).await;
        if result.is_err() {
            remove_temps(&paths).await;
        }
        result?;

        Ok(PipelineOutcome {
            artifact: artifact(identity, paths),
            cache_hit: false,
            rendered: false,
            duration: started.elapsed(),
        })
    }

    /// Delete every stored artifact of a record
    ///
    /// Called when a record is updated, before its new artifact is generated.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact store cannot be listed.
    pub async fn invalidate(&self, record: &EncounterRecord) -> Result<usize> {
        self.invalidate_id(record.kind(), record.identity()?.id).await
    }

    /// Delete every stored artifact for `kind` and `id`
    ///
    /// Waits for running generations of the record to finish and holds
    /// new ones back until the deletion is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact store cannot be listed.
    pub async fn invalidate_id(&self, kind: FormKind, id: RecordId) -> Result<usize> {
        let _record = self.records.invalidating(kind, id).await;
        let removed = self.cache.invalidate(kind, id).await?;
        tracing::info!(kind = %kind, record_id = %id, removed, "Invalidated artifacts");
        Ok(removed)
    }

    async fn cached(
        &self,
        identity: &ArtifactIdentity,
        paths: &ArtifactPaths,
        started: Instant,
    ) -> Option<PipelineOutcome> {
        let path = self.cache.get(identity).await?;
        log_cache_hit!(path);
        Some(PipelineOutcome {
            artifact: GeneratedArtifact {
                identity: identity.clone(),
                editable: paths.editable.clone(),
                fixed_layout: path,
            },
            cache_hit: true,
            rendered: false,
            duration: started.elapsed(),
        })
    }

    /// Returns whether the template render ran
    async fn generate(
        &self,
        record: &EncounterRecord,
        identity: &ArtifactIdentity,
        paths: &ArtifactPaths,
        cancel: &CancelSignal,
    ) -> Result<bool> {
        let mut rendered = false;

        // A previous conversion failure leaves a reusable editable artifact
        if is_ready(&paths.editable).await {
            tracing::debug!(
                path = %paths.editable.display(),
                "Reusing editable artifact"
            );
        } else {
            check(cancel, "map")?;
            let stage = Instant::now();
            let ctx = MappingContext::new(self.today(), self.clinic.clone());
            let fields = map_record(record, &ctx)?;
            let rows = repeating_items(record);
            log_stage_complete!("map", stage.elapsed());

            check(cancel, "render")?;
            let stage = Instant::now();
            let descriptor = self.registry.descriptor(identity.kind);
            let document = self
                .renderer
                .render(descriptor, &fields, rows, &paths.editable)
                .await?;
            tracing::debug!(rows = document.rows, "Editable artifact rendered");
            log_stage_complete!("render", stage.elapsed());
            rendered = true;
        }

        check(cancel, "convert")?;
        self.convert(identity, paths).await?;
        Ok(rendered)
    }

    async fn convert(&self, identity: &ArtifactIdentity, paths: &ArtifactPaths) -> Result<()> {
        let stage = Instant::now();
        if let Err(e) = self
            .converter
            .convert(&paths.editable, &paths.fixed_layout)
            .await
        {
            tracing::error!(
                converter = self.converter.name(),
                kind = %identity.kind,
                record_id = %identity.id,
                error = %e,
                "Conversion failed; editable artifact kept"
            );
            return Err(e);
        }
        verify_output(&paths.fixed_layout).await?;
        log_stage_complete!("convert", stage.elapsed());

        self.cache.put(identity, &paths.fixed_layout).await
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn artifact(identity: ArtifactIdentity, paths: ArtifactPaths) -> GeneratedArtifact {
    GeneratedArtifact {
        identity,
        editable: paths.editable,
        fixed_layout: paths.fixed_layout,
    }
}

/// Remove leftover `<artifact>.<uuid>.tmp` siblings of either path
async fn remove_temps(paths: &ArtifactPaths) {
    let Some(dir) = paths.fixed_layout.parent() else {
        return;
    };
    let prefixes: Vec<String> = [&paths.editable, &paths.fixed_layout]
        .iter()
        .filter_map(|p| file_name(p))
        .map(|name| format!("{name}."))
        .collect();

    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let Some(name) = file_name(&path) else {
            continue;
        };
        if is_temp_path(&path) && prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}
