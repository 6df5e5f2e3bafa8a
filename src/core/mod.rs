//! Core business logic for Clinidoc.
//!
//! # Modules
//!
//! - [`mapping`] - record → placeholder table, one mapping per form kind
//! - [`render`] - template registry, repeating-region expansion and substitution
//! - [`cache`] - deterministic artifact paths, the artifact cache and single-flight
//! - [`pipeline`] - the coordinator that ties the stages together
//!
//! # Document Workflow
//!
//! 1. **Identity**: derive the artifact identity from the record header
//! 2. **Cache check**: an existing print-ready artifact is returned as-is
//! 3. **Map**: build the field table for the record's form kind
//! 4. **Expand**: pad or reject repeating rows against the template region
//! 5. **Render**: substitute into the layout template, write the editable artifact
//! 6. **Convert**: produce the print-ready artifact and verify it
//!
//! # Example
//!
//! ```rust,no_run
//! use clinidoc::config::load_config;
//! use clinidoc::core::pipeline::DocumentPipeline;
//! use clinidoc::domain::EncounterRecord;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinidoc.toml")?;
//! let pipeline = DocumentPipeline::new(&config)?;
//!
//! // Fires on shutdown
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let record = EncounterRecord::from_json(&std::fs::read_to_string("bp_chart_7.json")?)?;
//! let outcome = pipeline.ensure_artifact(&record, &shutdown_rx).await?;
//! println!("{}", outcome.summary());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod mapping;
pub mod pipeline;
pub mod render;
