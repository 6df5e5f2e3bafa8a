//! Cooperative cancellation between pipeline stages
//!
//! Uses the same `watch` channel as process shutdown: `true` means stop.
//! Stages are never interrupted mid-call; the signal is checked between
//! them.

use crate::domain::{ClinidocError, Result};
use tokio::sync::watch;

pub type CancelSignal = watch::Receiver<bool>;

/// A signal that never fires
pub fn never_cancelled() -> CancelSignal {
    let (_tx, rx) = watch::channel(false);
    rx
}

/// Fail with [`ClinidocError::Cancelled`] if the signal has fired
pub fn check(cancel: &CancelSignal, next_stage: &str) -> Result<()> {
    if *cancel.borrow() {
        tracing::info!(stage = next_stage, "Generation cancelled");
        return Err(ClinidocError::Cancelled(next_stage.to_string()));
    }
    Ok(())
}
