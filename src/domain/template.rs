//! Template descriptor domain model
//!
//! A descriptor names the layout file for one form kind and declares the
//! placeholder vocabulary its mapper must cover.

use super::ids::FormKind;
use serde::{Deserialize, Serialize};

/// Repeating table region of a template
///
/// The row containing `anchor` is cloned once per expanded item. Every
/// column name is a placeholder that appears in that row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingRegion {
    /// Placeholder that marks the row to clone
    pub anchor: String,
    /// Placeholders filled per row (the anchor is one of them)
    pub columns: Vec<String>,
    /// Rows always rendered, padding with blanks
    pub min_rows: usize,
    /// Rows the page layout can hold before breaking
    pub max_rows: usize,
}

impl RepeatingRegion {
    /// Creates a region; `anchor` must be one of `columns`
    pub fn new(anchor: &str, columns: &[&str], min_rows: usize, max_rows: usize) -> Self {
        debug_assert!(columns.contains(&anchor));
        debug_assert!(min_rows <= max_rows);
        Self {
            anchor: anchor.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            min_rows,
            max_rows,
        }
    }
}

/// Identifies the layout file for a form kind and its placeholders
///
/// # Examples
///
/// ```
/// use clinidoc::domain::template::TemplateDescriptor;
/// use clinidoc::domain::FormKind;
///
/// let descriptor = TemplateDescriptor::new(FormKind::MedicalCertificate, &["name", "age"]);
/// assert_eq!(descriptor.file_name, "medical_certificate.fodt");
/// assert!(descriptor.repeating.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub kind: FormKind,
    /// File name relative to the template directory
    pub file_name: String,
    /// Scalar placeholders the field mapper must supply
    pub placeholders: Vec<String>,
    /// Optional cloned-row region
    pub repeating: Option<RepeatingRegion>,
}

impl TemplateDescriptor {
    /// Descriptor without a repeating region; file name derives from the kind slug
    pub fn new(kind: FormKind, placeholders: &[&str]) -> Self {
        Self {
            kind,
            file_name: format!("{}.fodt", kind.slug()),
            placeholders: placeholders.iter().map(|p| p.to_string()).collect(),
            repeating: None,
        }
    }

    /// Attach a repeating region
    pub fn with_repeating(mut self, region: RepeatingRegion) -> Self {
        self.repeating = Some(region);
        self
    }

    /// Scalar placeholders plus any row columns
    pub fn all_placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(String::as_str).chain(
            self.repeating
                .iter()
                .flat_map(|r| r.columns.iter().map(String::as_str)),
        )
    }
}
