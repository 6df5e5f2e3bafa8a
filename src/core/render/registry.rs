//! Kind → template descriptor table
//!
//! One generic render engine serves every form kind; the registry is the
//! only place that knows which layout and placeholder set belongs to which
//! kind.

use crate::config::TemplateConfig;
use crate::core::mapping::{blood_pressure, placeholders_for};
use crate::domain::errors::RenderError;
use crate::domain::{FormKind, RepeatingRegion, Result, TemplateDescriptor};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Descriptor table over a template directory
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    dir: PathBuf,
    descriptors: HashMap<FormKind, TemplateDescriptor>,
}

impl TemplateRegistry {
    /// Build the table for every known form kind
    pub fn new(config: &TemplateConfig) -> Self {
        let descriptors = FormKind::ALL
            .iter()
            .map(|&kind| (kind, describe(kind, config)))
            .collect();
        Self {
            dir: PathBuf::from(&config.dir),
            descriptors,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn descriptor(&self, kind: FormKind) -> &TemplateDescriptor {
        // Built from FormKind::ALL, so every kind is present
        &self.descriptors[&kind]
    }

    /// Absolute location of a descriptor's layout file
    pub fn template_path(&self, descriptor: &TemplateDescriptor) -> PathBuf {
        self.dir.join(&descriptor.file_name)
    }

    /// Check every layout file is present
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateNotFound`] for the first missing file.
    pub fn validate(&self) -> Result<()> {
        for kind in FormKind::ALL {
            let path = self.template_path(self.descriptor(kind));
            if !path.is_file() {
                return Err(RenderError::TemplateNotFound(path).into());
            }
        }
        Ok(())
    }
}

fn describe(kind: FormKind, config: &TemplateConfig) -> TemplateDescriptor {
    let descriptor = TemplateDescriptor::new(kind, &placeholders_for(kind));
    match kind {
        FormKind::BloodPressureChart => descriptor.with_repeating(RepeatingRegion::new(
            blood_pressure::READING_ANCHOR,
            blood_pressure::READING_COLUMNS,
            config.bp_chart_min_rows,
            config.bp_chart_max_rows,
        )),
        _ => descriptor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClinidocError;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &Path) -> TemplateConfig {
        TemplateConfig {
            dir: dir.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_only_bp_chart_repeats() {
        let registry = TemplateRegistry::new(&TemplateConfig::default());
        for kind in FormKind::ALL {
            let descriptor = registry.descriptor(kind);
            assert_eq!(
                descriptor.repeating.is_some(),
                kind == FormKind::BloodPressureChart
            );
        }
        let region = registry
            .descriptor(FormKind::BloodPressureChart)
            .repeating
            .as_ref()
            .unwrap();
        assert_eq!(region.anchor, "reading_d");
        assert_eq!(region.min_rows, 11);
        assert_eq!(region.max_rows, 31);
    }

    #[test]
    fn test_validate_reports_missing_template() {
        let dir = TempDir::new().unwrap();
        let registry = TemplateRegistry::new(&config(dir.path()));
        let err = registry.validate().unwrap_err();
        assert!(matches!(
            err,
            ClinidocError::Render(RenderError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_validate_passes_with_all_templates() {
        let dir = TempDir::new().unwrap();
        for kind in FormKind::ALL {
            fs::write(dir.path().join(format!("{}.fodt", kind.slug())), "<x/>").unwrap();
        }
        let registry = TemplateRegistry::new(&config(dir.path()));
        assert!(registry.validate().is_ok());
    }
}
