// Clinidoc - Clinical Document Rendering Pipeline
// Copyright (c) 2025 Clinidoc Contributors
// Licensed under the MIT License

//! # Clinidoc - Clinical Document Rendering
//!
//! Clinidoc turns structured clinic encounter records (blood-pressure charts,
//! incident reports, referrals, certificates) into a filled-in editable
//! office document and a print-ready PDF, caches both on disk, and serves
//! them inline, for printing or as a download.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Mapping, rendering, caching and the pipeline coordinator
//! - [`adapters`] - Format conversion, record lookup and HTTP delivery
//! - [`domain`] - Records, identifiers, descriptors and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clinidoc::adapters::delivery::{DeliveryMode, DocumentDelivery};
//! use clinidoc::config::load_config;
//! use clinidoc::core::pipeline::{never_cancelled, DocumentPipeline};
//! use clinidoc::domain::EncounterRecord;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("clinidoc.toml")?;
//!     let delivery = DocumentDelivery::new(Arc::new(DocumentPipeline::new(&config)?));
//!
//!     let record = EncounterRecord::from_json(&std::fs::read_to_string("record.json")?)?;
//!     let response = delivery
//!         .deliver(&record, DeliveryMode::PreviewPrint, &never_cancelled())
//!         .await?;
//!
//!     println!("{} ({} bytes)", response.filename, response.body.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Artifacts
//!
//! Every artifact name is derived from the record alone:
//!
//! ```text
//! {kind}_{id}_{subject}_{YYYYmmddHHMMSS}[_r{revision}].{fodt|pdf}
//! ```
//!
//! so an existing non-empty file *is* the cache entry, and a record update
//! (new timestamp) naturally addresses a new file. Concurrent requests for
//! the same artifact are collapsed into one generation per process.
//!
//! ## Error Handling
//!
//! All errors are [`domain::ClinidocError`]. Its
//! [`category`](domain::ClinidocError::category) drives the CLI exit code
//! and the HTTP status; only the generic
//! [`user_message`](domain::ClinidocError::user_message) ever reaches a user.
//!
//! ```rust
//! use clinidoc::domain::{ClinidocError, ConversionError, ErrorCategory};
//!
//! let err: ClinidocError = ConversionError::Timeout.into();
//! assert_eq!(err.category(), ErrorCategory::Conversion);
//! assert!(err.is_conversion_failure());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
