//! Domain models and types for Clinidoc.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`RecordId`], [`FormKind`])
//! - **Encounter records** ([`EncounterRecord`] and one struct per form kind)
//! - **Artifacts** ([`ArtifactIdentity`], [`GeneratedArtifact`])
//! - **Template descriptors** ([`TemplateDescriptor`], [`RepeatingRegion`])
//! - **Error types** ([`ClinidocError`], [`InputError`], [`RenderError`], [`ConversionError`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ClinidocError>`](Result). The
//! error exposes a [`category`](ClinidocError::category) so callers can choose
//! a user-facing message without matching every variant:
//!
//! ```rust
//! use clinidoc::domain::{ClinidocError, ErrorCategory, InputError};
//!
//! let err: ClinidocError = InputError::MissingIdentity("subject").into();
//! assert_eq!(err.category(), ErrorCategory::Input);
//! ```

pub mod artifact;
pub mod context;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod template;

pub use artifact::{ArtifactIdentity, GeneratedArtifact};
pub use context::ResultExt;
pub use errors::{ClinidocError, ConversionError, ErrorCategory, InputError, RenderError};
pub use ids::{FormKind, RecordId};
pub use record::{
    BloodPressureChart, BpReading, DentalCertificate, EncounterRecord, GeneralReferral,
    IncidentReport, LabReferral, MedicalCertificate, RecordHeader, Staff, Subject,
};
pub use result::Result;
pub use template::{RepeatingRegion, TemplateDescriptor};
