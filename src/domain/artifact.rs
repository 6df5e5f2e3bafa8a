//! Generated artifact model
//!
//! An artifact is named purely from its identity tuple; the tuple doubles as
//! the cache key.

use super::ids::{FormKind, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity tuple an artifact's paths are derived from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    pub kind: FormKind,
    pub id: RecordId,
    /// Unsanitised subject name; the path resolver slugifies it
    pub subject_name: String,
    /// `updated_at` if the record was edited, else `created_at`
    pub stamp: DateTime<Utc>,
    /// Optional explicit content version
    pub revision: Option<u32>,
}

/// The pair of files produced for one identity
///
/// Never mutated in place: a changed record yields a new identity and thus a
/// new pair of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub identity: ArtifactIdentity,
    /// Editable office document produced by template substitution
    pub editable: PathBuf,
    /// Print-stable document produced by the format converter
    pub fixed_layout: PathBuf,
}

impl GeneratedArtifact {
    /// Whether the fixed-layout file is present on disk
    pub fn is_complete(&self) -> bool {
        self.fixed_layout.is_file()
    }
}
