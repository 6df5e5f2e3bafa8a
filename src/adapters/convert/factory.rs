//! Converter factory
//!
//! The strategy is decided once, at construction. `auto` picks remote when
//! a credential is configured and local otherwise; a remote failure at
//! runtime is reported, never silently retried locally.

use super::{DocumentConverter, LocalConverter, RemoteConverter};
use crate::config::{ConverterConfig, ConverterStrategy};
use crate::domain::Result;
use std::sync::Arc;

/// Create the converter selected by configuration
///
/// # Errors
///
/// Returns an error if `remote` is selected without a credential or the
/// HTTP client cannot be built.
pub fn create_converter(config: &ConverterConfig) -> Result<Arc<dyn DocumentConverter>> {
    let strategy = config.effective_strategy();
    tracing::info!(
        configured = %config.strategy,
        effective = %strategy,
        "Selecting format converter"
    );

    match strategy {
        ConverterStrategy::Remote => Ok(Arc::new(RemoteConverter::new(&config.remote)?)),
        ConverterStrategy::Local | ConverterStrategy::Auto => Ok(Arc::new(LocalConverter::new())),
    }
}
