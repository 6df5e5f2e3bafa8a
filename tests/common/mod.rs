//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use clinidoc::adapters::convert::{DocumentConverter, LocalConverter};
use clinidoc::config::TemplateConfig;
use clinidoc::core::cache::FsArtifactCache;
use clinidoc::core::mapping::ClinicProfile;
use clinidoc::core::pipeline::DocumentPipeline;
use clinidoc::core::render::TemplateRegistry;
use clinidoc::domain::{
    BloodPressureChart, BpReading, EncounterRecord, RecordHeader, RecordId, Result, Subject,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The layout templates shipped with the crate
pub fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn clinic() -> ClinicProfile {
    ClinicProfile {
        name: "University Health Services".to_string(),
        address: Some("Student Center".to_string()),
        contact_number: None,
        physician_in_charge: Some("Jose Rizal, MD".to_string()),
        physician_license: Some("0012345".to_string()),
    }
}

pub fn pipeline_with(artifact_dir: &Path, converter: Arc<dyn DocumentConverter>) -> DocumentPipeline {
    let registry = TemplateRegistry::new(&TemplateConfig {
        dir: templates_dir().to_string_lossy().into_owned(),
        ..Default::default()
    });
    DocumentPipeline::with_parts(
        registry,
        artifact_dir.to_path_buf(),
        Arc::new(FsArtifactCache::new(artifact_dir)),
        converter,
        clinic(),
    )
    .unwrap()
    .with_today(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

pub fn local_pipeline(artifact_dir: &Path) -> DocumentPipeline {
    pipeline_with(artifact_dir, Arc::new(LocalConverter::new()))
}

pub fn subject(first: &str, last: &str) -> Subject {
    Subject {
        first_name: first.to_string(),
        last_name: last.to_string(),
        birthdate: NaiveDate::from_ymd_opt(2003, 9, 14),
        is_male: Some(false),
        program: Some("BS Nursing".to_string()),
        college: Some("College of Health".to_string()),
        ..Default::default()
    }
}

pub fn header(id: u64, subject: Subject) -> RecordHeader {
    RecordHeader {
        id: Some(RecordId::new(id).unwrap()),
        subject: Some(subject),
        created_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()),
        ..Default::default()
    }
}

pub fn reading(day: u32, value: &str) -> BpReading {
    BpReading {
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        time: chrono::NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
        value: value.to_string(),
        flagged: false,
        remarks: None,
    }
}

pub fn bp_chart(id: u64, readings: usize) -> EncounterRecord {
    EncounterRecord::BloodPressureChart(BloodPressureChart {
        header: header(id, subject("Maria", "Santos")),
        recorded_by: None,
        readings: (0..readings)
            .map(|i| reading(1 + (i as u32 % 28), "120/80"))
            .collect(),
        maintenance_medication: Some("Amlodipine 5mg".to_string()),
        hypertensive: true,
        diabetic: false,
        remarks: None,
    })
}

/// Writes a fixed PDF after an optional delay and counts calls
pub struct StubConverter {
    pub calls: AtomicUsize,
    pub delay: Duration,
}

impl StubConverter {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentConverter for StubConverter {
    async fn convert(&self, _editable: &Path, target: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        tokio::fs::write(target, b"%PDF-1.4 stub").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Claims success without producing anything
pub struct SilentConverter;

#[async_trait]
impl DocumentConverter for SilentConverter {
    async fn convert(&self, _editable: &Path, _target: &Path) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

/// Files in `dir` with the given extension
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == extension))
        .collect()
}
