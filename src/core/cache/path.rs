//! Deterministic artifact paths
//!
//! The path computed here is the cache key: identical identity tuples always
//! resolve to identical paths.

use crate::domain::{ArtifactIdentity, FormKind, RecordId};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Second-precision timestamp format used in artifact names
pub const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub const EDITABLE_EXTENSION: &str = "fodt";
pub const FIXED_LAYOUT_EXTENSION: &str = "pdf";

/// Identifier-safe slug of a subject name
///
/// Spaces become underscores, then everything but ASCII letters, digits,
/// `_` and `-` is dropped. An empty result becomes `unknown`.
///
/// # Examples
///
/// ```
/// use clinidoc::core::cache::slugify;
///
/// assert_eq!(slugify("María Dela Cruz"), "Mara_Dela_Cruz");
/// assert_eq!(slugify("  "), "__");
/// assert_eq!(slugify("ñ"), "unknown");
/// ```
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

pub fn format_stamp(ts: DateTime<Utc>) -> String {
    ts.format(STAMP_FORMAT).to_string()
}

/// File-name prefix shared by every artifact of one record
pub fn record_prefix(kind: FormKind, id: RecordId) -> String {
    format!("{}_{}_", kind.slug(), id)
}

/// Artifact file stem for an identity, without extension
pub fn artifact_stem(identity: &ArtifactIdentity) -> String {
    let mut stem = format!(
        "{}{}_{}",
        record_prefix(identity.kind, identity.id),
        slugify(&identity.subject_name),
        format_stamp(identity.stamp)
    );
    if let Some(revision) = identity.revision {
        stem.push_str(&format!("_r{revision}"));
    }
    stem
}

/// Resolved pair of artifact paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub editable: PathBuf,
    pub fixed_layout: PathBuf,
}

impl ArtifactPaths {
    /// Resolve both paths for an identity under `dir`
    pub fn resolve(dir: &Path, identity: &ArtifactIdentity) -> Self {
        let stem = artifact_stem(identity);
        Self {
            editable: dir.join(format!("{stem}.{EDITABLE_EXTENSION}")),
            fixed_layout: dir.join(format!("{stem}.{FIXED_LAYOUT_EXTENSION}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn identity(revision: Option<u32>) -> ArtifactIdentity {
        ArtifactIdentity {
            kind: FormKind::BloodPressureChart,
            id: RecordId::new(42).unwrap(),
            subject_name: "Juan Dela Cruz".to_string(),
            stamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
            revision,
        }
    }

    #[test_case("Juan Dela Cruz", "Juan_Dela_Cruz" ; "spaces")]
    #[test_case("O'Neil-Smith", "ONeil-Smith" ; "apostrophe dropped hyphen kept")]
    #[test_case("José Peña", "Jos_Pea" ; "non ascii letters dropped")]
    #[test_case("../../etc/passwd", "etcpasswd" ; "path separators dropped")]
    #[test_case("", "unknown" ; "empty")]
    #[test_case("äöü", "unknown" ; "nothing survives")]
    fn test_slugify(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_resolve_format() {
        let paths = ArtifactPaths::resolve(Path::new("/srv/docs"), &identity(None));
        assert_eq!(
            paths.editable,
            PathBuf::from("/srv/docs/bp_chart_42_Juan_Dela_Cruz_20240305140709.fodt")
        );
        assert_eq!(
            paths.fixed_layout,
            PathBuf::from("/srv/docs/bp_chart_42_Juan_Dela_Cruz_20240305140709.pdf")
        );
    }

    #[test]
    fn test_resolve_with_revision() {
        let paths = ArtifactPaths::resolve(Path::new("docs"), &identity(Some(3)));
        assert_eq!(
            paths.fixed_layout,
            PathBuf::from("docs/bp_chart_42_Juan_Dela_Cruz_20240305140709_r3.pdf")
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let a = ArtifactPaths::resolve(Path::new("docs"), &identity(Some(1)));
        let b = ArtifactPaths::resolve(Path::new("docs"), &identity(Some(1)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_changed_stamp_changes_path() {
        let mut edited = identity(None);
        edited.stamp = edited.stamp + chrono::Duration::seconds(1);
        assert_ne!(
            ArtifactPaths::resolve(Path::new("docs"), &identity(None)),
            ArtifactPaths::resolve(Path::new("docs"), &edited)
        );
    }

    #[test]
    fn test_stem_starts_with_record_prefix() {
        let id = identity(None);
        assert!(artifact_stem(&id).starts_with(&record_prefix(id.kind, id.id)));
    }
}
