//! Format converter trait definition
//!
//! Remote and local conversion are two implementations of one interface,
//! selected by configuration. Both must leave a fixed-layout file at the
//! target path or fail with a distinguishable [`ConversionError`].

use crate::core::cache::is_ready;
use crate::domain::{ConversionError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Editable → fixed-layout converter
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert the editable artifact at `editable` into `target`
    ///
    /// Implementations must not leave a partial file at `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when the conversion fails.
    async fn convert(&self, editable: &Path, target: &Path) -> Result<()>;

    /// Short strategy name for logs
    fn name(&self) -> &'static str;
}

/// Post-condition check applied after every conversion
///
/// Converters have been seen to report success without the file ever
/// materialising, so success is only trusted once the output is on disk.
///
/// # Errors
///
/// Returns [`ConversionError::OutputMissing`] if `path` is absent or empty.
pub async fn verify_output(path: &Path) -> Result<()> {
    if is_ready(path).await {
        Ok(())
    } else {
        Err(ConversionError::OutputMissing(path.to_path_buf()).into())
    }
}
