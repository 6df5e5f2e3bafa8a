//! End-to-end pipeline tests against the shipped templates and the local converter

mod common;

use chrono::{TimeZone, Utc};
use clinidoc::core::pipeline::never_cancelled;
use clinidoc::domain::{ClinidocError, EncounterRecord, ErrorCategory, InputError};
use common::{bp_chart, files_with_extension, local_pipeline};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use tempfile::TempDir;
use test_case::test_case;

const READING_ROW: &str = r#"<table:table-row table:style-name="ReadingRow">"#;

#[tokio::test]
async fn test_bp_chart_pads_to_minimum_rows() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());

    let outcome = pipeline
        .ensure_artifact(&bp_chart(7, 3), &never_cancelled())
        .await
        .unwrap();

    let editable = std::fs::read_to_string(&outcome.artifact.editable).unwrap();
    assert_eq!(editable.matches(READING_ROW).count(), 11);
    assert_eq!(editable.matches("120/80").count(), 3);
    assert!(!editable.contains("${"));

    let pdf = std::fs::read(&outcome.artifact.fixed_layout).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(!outcome.cache_hit);
}

#[tokio::test]
async fn test_bp_chart_over_capacity_is_rejected_before_rendering() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());

    let err = pipeline
        .ensure_artifact(&bp_chart(8, 32), &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClinidocError::Input(InputError::CapacityExceeded { rows: 32, max: 31, .. })
    ));
    assert!(files_with_extension(dir.path(), "fodt").is_empty());
    assert!(files_with_extension(dir.path(), "pdf").is_empty());
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let record = bp_chart(9, 5);

    let first = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();
    let modified = std::fs::metadata(&first.artifact.fixed_layout)
        .unwrap()
        .modified()
        .unwrap();

    let second = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();
    assert!(second.cache_hit);
    assert!(!second.rendered);
    assert_eq!(second.artifact.fixed_layout, first.artifact.fixed_layout);
    assert_eq!(
        std::fs::metadata(&second.artifact.fixed_layout)
            .unwrap()
            .modified()
            .unwrap(),
        modified
    );
}

#[tokio::test]
async fn test_same_record_renders_identical_bytes() {
    let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
    let record = bp_chart(10, 4);

    let first = local_pipeline(a.path())
        .ensure_artifact(&record, &never_cancelled())
        .await
        .unwrap();
    let second = local_pipeline(b.path())
        .ensure_artifact(&record, &never_cancelled())
        .await
        .unwrap();

    assert_eq!(
        first.artifact.fixed_layout.file_name(),
        second.artifact.fixed_layout.file_name()
    );
    assert_eq!(
        std::fs::read(&first.artifact.editable).unwrap(),
        std::fs::read(&second.artifact.editable).unwrap()
    );
    for outcome in [&first, &second] {
        let pdf = std::fs::read(&outcome.artifact.fixed_layout).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }
}

#[tokio::test]
async fn test_missing_identity_produces_nothing() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let record = EncounterRecord::from_json(
        r#"{"kind": "lab_referral", "id": 4, "subject": {"first_name": "Ana", "last_name": "Reyes"}, "cbc": true}"#,
    )
    .unwrap();

    let err = pipeline
        .ensure_artifact(&record, &never_cancelled())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Input);
    assert!(matches!(
        err,
        ClinidocError::Input(InputError::MissingIdentity("created_at"))
    ));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_updated_record_replaces_stale_artifacts() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let original = bp_chart(11, 2);

    let first = pipeline.ensure_artifact(&original, &never_cancelled()).await.unwrap();

    let mut updated = original.clone();
    if let EncounterRecord::BloodPressureChart(chart) = &mut updated {
        chart.header.updated_at = Some(Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap());
        chart.readings.push(common::reading(3, "135/90"));
    }

    assert_eq!(pipeline.invalidate(&updated).await.unwrap(), 2);
    let second = pipeline.ensure_artifact(&updated, &never_cancelled()).await.unwrap();

    assert_ne!(first.artifact.fixed_layout, second.artifact.fixed_layout);
    assert!(!first.artifact.fixed_layout.exists());
    assert!(second
        .artifact
        .fixed_layout
        .to_string_lossy()
        .ends_with("_20240603140000.pdf"));
    assert_eq!(files_with_extension(dir.path(), "pdf").len(), 1);
    let editable = std::fs::read_to_string(&second.artifact.editable).unwrap();
    assert!(editable.contains("135/90"));
}

#[test_case(r#"{"kind": "incident_report", "id": 21, "subject": {"first_name": "Leo", "last_name": "Tan"},
    "created_at": "2024-04-02T10:00:00Z", "incident_date": "2024-04-02", "incident_time": "09:40:00",
    "location": "Gym", "nature_of_incident": "Sprain", "description": "Twisted ankle\nduring drills",
    "first_aid_given": true, "witnesses": ["Coach Cruz", "R. Lim"]}"#, "Twisted ankle" ; "incident report")]
#[test_case(r#"{"kind": "lab_referral", "id": 22, "subject": {"first_name": "Ana", "last_name": "Reyes"},
    "created_at": "2024-04-02T10:00:00Z", "cbc": true, "ecg": true, "clinical_impression": "R/O anemia",
    "physician": {"first_name": "Jose", "last_name": "Rizal", "title": "MD", "license_number": "0012345"}}"#,
    "R/O anemia" ; "lab referral")]
#[test_case(r#"{"kind": "general_referral", "id": 23, "subject": {"first_name": "Ana", "last_name": "Reyes"},
    "created_at": "2024-04-02T10:00:00Z", "referred_to": "City Hospital ER", "urgent": true,
    "diagnosis": "Acute appendicitis"}"#, "City Hospital ER" ; "general referral")]
#[test_case(r#"{"kind": "medical_certificate", "id": 24, "subject": {"first_name": "Ana", "last_name": "Reyes"},
    "created_at": "2024-04-02T10:00:00Z", "diagnosis": "URTI", "rest_days": 2, "fit_to_resume": true,
    "purpose": "excuse from class"}"#, "2 days" ; "medical certificate")]
#[test_case(r#"{"kind": "dental_certificate", "id": 25, "subject": {"first_name": "Ana", "last_name": "Reyes"},
    "created_at": "2024-04-02T10:00:00Z", "procedures": ["Scaling", "Polishing"], "oral_prophylaxis": true,
    "purpose": "OJT requirement"}"#, "OJT requirement" ; "dental certificate")]
#[tokio::test]
async fn test_every_kind_renders(json: &str, expected_text: &str) {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let record = EncounterRecord::from_json(json).unwrap();

    let outcome = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();

    let editable = std::fs::read_to_string(&outcome.artifact.editable).unwrap();
    assert!(!editable.contains("${"));
    assert!(editable.contains(expected_text));
    assert!(editable.contains("University Health Services"));
    let name = outcome
        .artifact
        .fixed_layout
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    let id = record.header().id.unwrap();
    assert!(name.starts_with(&format!("{}_{id}_", record.kind().slug())));
    assert!(name.ends_with("_20240402100000.pdf"));
    assert!(std::fs::metadata(&outcome.artifact.fixed_layout).unwrap().len() > 0);
}

#[tokio::test]
async fn test_generated_demographics_are_escaped_and_slugged() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());

    for id in 1..=5u64 {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        let mut record = bp_chart(100 + id, 2);
        if let EncounterRecord::BloodPressureChart(chart) = &mut record {
            let subject = chart.header.subject.as_mut().unwrap();
            subject.first_name = format!("{first} & Co");
            subject.last_name = format!("{last} <O'Neil>");
        }

        let outcome = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();
        let editable = std::fs::read_to_string(&outcome.artifact.editable).unwrap();
        assert!(editable.contains("&amp; Co"));
        assert!(editable.contains("&lt;O&apos;Neil&gt;"));

        let name = outcome.artifact.fixed_layout.file_name().unwrap().to_string_lossy().to_string();
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')));
    }
}

#[tokio::test]
async fn test_placeholder_syntax_in_record_text_is_literal() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let record = EncounterRecord::from_json(
        r#"{"kind": "medical_certificate", "id": 26, "subject": {"first_name": "Ana", "last_name": "Reyes"},
        "created_at": "2024-04-02T10:00:00Z", "diagnosis": "rash ${x} noted"}"#,
    )
    .unwrap();

    let outcome = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();

    let editable = std::fs::read_to_string(&outcome.artifact.editable).unwrap();
    assert!(editable.contains("rash ${x} noted"));
}

#[tokio::test]
async fn test_reading_remark_is_not_substituted_again() {
    let dir = TempDir::new().unwrap();
    let pipeline = local_pipeline(dir.path());
    let mut record = bp_chart(27, 1);
    if let EncounterRecord::BloodPressureChart(chart) = &mut record {
        chart.readings[0].remarks = Some("see ${clinic_name}".to_string());
    }

    let outcome = pipeline.ensure_artifact(&record, &never_cancelled()).await.unwrap();

    let editable = std::fs::read_to_string(&outcome.artifact.editable).unwrap();
    assert!(editable.contains("see ${clinic_name}"));
    assert!(!editable.contains("see University Health Services"));
}
