//! Domain error types
//!
//! The pipeline raises typed errors so the controller boundary can pick a
//! user-facing message per category. Third-party error types never leak
//! through these enums; they are converted to strings at the adapter edge.

use std::path::PathBuf;
use thiserror::Error;

use super::ids::FormKind;

/// Main Clinidoc error type
#[derive(Debug, Error)]
pub enum ClinidocError {
    /// Configuration-related errors (bad config file, missing template directory)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The record handed to the pipeline is structurally unusable
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Template loading, substitution or persistence failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Editable to fixed-layout conversion failed
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The caller went away and the request was aborted between stages
    #[error("Request cancelled during {0}")]
    Cancelled(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Coarse error category used by the controller boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing template, missing or rejected credential
    Configuration,
    /// Missing identity triplet, repeating items over capacity
    Input,
    /// Remote or local conversion failed, or output never materialised
    Conversion,
    /// The renderer could not persist its output
    PartialState,
    /// Request aborted
    Cancelled,
    /// Anything else
    Internal,
}

impl ClinidocError {
    /// Classify the error for presentation
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClinidocError::Configuration(_) => ErrorCategory::Configuration,
            ClinidocError::Input(_) => ErrorCategory::Input,
            ClinidocError::Render(e) => match e {
                RenderError::TemplateNotFound(_)
                | RenderError::UnexpectedRepeatingItems(_)
                | RenderError::AnchorRowNotFound(_)
                | RenderError::UnresolvedPlaceholder(_) => ErrorCategory::Configuration,
                RenderError::WriteFailed(_) => ErrorCategory::PartialState,
            },
            ClinidocError::Conversion(e) => match e {
                ConversionError::CredentialMissing | ConversionError::CredentialRejected(_) => {
                    ErrorCategory::Configuration
                }
                _ => ErrorCategory::Conversion,
            },
            ClinidocError::Cancelled(_) => ErrorCategory::Cancelled,
            ClinidocError::Io(_) | ClinidocError::Serialization(_) | ClinidocError::Other(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Generic message safe to show to an end user
    ///
    /// Never includes internal diagnostics such as paths, status bodies or
    /// credential details.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClinidocError::Input(InputError::CapacityExceeded { .. }) => {
                "This record has more entries than the printed form can hold."
            }
            ClinidocError::Input(_) => "This record is incomplete and cannot be printed yet.",
            ClinidocError::Cancelled(_) => "The request was cancelled.",
            _ => match self.category() {
                ErrorCategory::Conversion => "Preview/print is unavailable right now, try again.",
                _ => "Failed to generate document.",
            },
        }
    }

    /// Whether a manual re-run of just the conversion step makes sense
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, ClinidocError::Conversion(_))
    }
}

/// Structural problems with the incoming record
#[derive(Debug, Error)]
pub enum InputError {
    /// One of id, subject or created_at is absent
    #[error("Record is missing mandatory field '{0}'")]
    MissingIdentity(&'static str),

    /// More line items than the template can clone rows for
    #[error("{kind} has {rows} rows but the template holds at most {max}")]
    CapacityExceeded {
        kind: FormKind,
        rows: usize,
        max: usize,
    },

    /// The record could not be decoded or is otherwise malformed
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Template renderer failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// Layout file for a kind is absent
    #[error("Template file not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Caller supplied line items but the template has no repeating anchor
    #[error("Template for {0} declares no repeating region but line items were supplied")]
    UnexpectedRepeatingItems(FormKind),

    /// The declared anchor does not sit inside a table row of the template
    #[error("Repeating anchor '{0}' is not inside a table row")]
    AnchorRowNotFound(String),

    /// A placeholder in the template had no value in the field table
    #[error("Placeholder '{0}' has no value")]
    UnresolvedPlaceholder(String),

    /// The editable artifact could not be persisted
    #[error("Failed to write editable artifact: {0}")]
    WriteFailed(String),
}

/// Format converter failures
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Remote strategy selected without an API credential
    #[error("Remote conversion credential is not configured")]
    CredentialMissing,

    /// Remote service refused the credential
    #[error("Remote conversion credential rejected (HTTP {0})")]
    CredentialRejected(u16),

    /// Transport failure talking to the remote service
    #[error("Conversion service unreachable: {0}")]
    Network(String),

    /// Remote call exceeded its timeout
    #[error("Conversion service timed out")]
    Timeout,

    /// Non-2xx response other than an auth failure
    #[error("Conversion service error: {status} - {message}")]
    ServiceError { status: u16, message: String },

    /// In-process reader/writer failed
    #[error("Local conversion failed: {0}")]
    LocalWriterFailed(String),

    /// Strategy reported success but produced no usable file
    #[error("Converter reported success but {} is missing or empty", .0.display())]
    OutputMissing(PathBuf),
}

impl From<std::io::Error> for ClinidocError {
    fn from(err: std::io::Error) -> Self {
        ClinidocError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ClinidocError {
    fn from(err: serde_json::Error) -> Self {
        ClinidocError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ClinidocError {
    fn from(err: toml::de::Error) -> Self {
        ClinidocError::Configuration(format!("TOML parse error: {err}"))
    }
}
