//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - human-readable console output on stderr
//! - optional JSON file output with daily or hourly rotation
//! - `RUST_LOG` overrides the configured level
//!
//! # Example
//!
//! ```no_run
//! use clinidoc::logging::init_logging;
//! use clinidoc::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a generation for one record
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_render_start;
/// use clinidoc::domain::{FormKind, RecordId};
///
/// let id = RecordId::new(7).unwrap();
/// log_render_start!(FormKind::BloodPressureChart, id);
/// ```
#[macro_export]
macro_rules! log_render_start {
    ($kind:expr, $id:expr) => {
        tracing::info!(
            kind = %$kind,
            record_id = %$id,
            "Generating document"
        );
    };
}

/// Log a completed pipeline stage with its elapsed time
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_stage_complete;
/// use std::time::Duration;
///
/// log_stage_complete!("render", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $elapsed:expr) => {
        tracing::debug!(
            stage = $stage,
            elapsed_ms = $elapsed.as_millis() as u64,
            "Stage complete"
        );
    };
}

/// Log a cache hit that skipped generation
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_cache_hit;
/// use std::path::Path;
///
/// log_cache_hit!(Path::new("storage/documents/bp_chart_7_Ana_20240601093000.pdf"));
/// ```
#[macro_export]
macro_rules! log_cache_hit {
    ($path:expr) => {
        tracing::debug!(path = %$path.display(), "Artifact cache hit");
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_error_with_context;
/// use clinidoc::domain::ClinidocError;
///
/// let error = ClinidocError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            category = ?$error.category(),
            context = $context,
            "Error occurred"
        );
    };
}
