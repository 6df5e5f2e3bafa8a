//! Encounter record domain model
//!
//! Records arrive already validated and already joined with their related
//! entities (patient demographics, clinic staff). The pipeline only checks the
//! structural presence of the fields it needs; business rules are the
//! persistence layer's concern.

use super::artifact::ArtifactIdentity;
use super::errors::InputError;
use super::ids::{FormKind, RecordId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Patient demographics joined onto a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    /// `true` for male, `false` for female, absent when not recorded
    #[serde(default)]
    pub is_male: Option<bool>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub year_level: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Subject {
    /// "First M. Last", skipping blank parts
    pub fn full_name(&self) -> String {
        let middle_initial = self
            .middle_name
            .as_deref()
            .map(str::trim)
            .and_then(|m| m.chars().next())
            .map(|c| format!("{c}."));

        [
            Some(self.first_name.trim().to_string()),
            middle_initial,
            Some(self.last_name.trim().to_string()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// "First Last" as used for artifact naming
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Clinic staff member (physician, nurse, dentist)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub first_name: String,
    pub last_name: String,
    /// Post-nominal or position, e.g. "MD", "RN", "DMD"
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub ptr_number: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

impl Staff {
    /// "First Last, MD"
    pub fn signature_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => format!("{}, {title}", name.trim()),
            _ => name.trim().to_string(),
        }
    }
}

/// Fields shared by every record kind
///
/// Everything is optional on the wire so that an absent identity field can
/// be reported as an input error instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordHeader {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub subject: Option<Subject>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Explicit content version, bumped by the persistence layer on edit
    #[serde(default)]
    pub revision: Option<u32>,
}

impl RecordHeader {
    /// Extract the identity tuple used for artifact naming
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingIdentity`] when id, subject (or its name)
    /// or created_at is absent.
    pub fn identity(&self, kind: FormKind) -> Result<ArtifactIdentity, InputError> {
        let id = self.id.ok_or(InputError::MissingIdentity("id"))?;
        let subject = self
            .subject
            .as_ref()
            .ok_or(InputError::MissingIdentity("subject"))?;
        let subject_name = subject.display_name();
        if subject_name.is_empty() {
            return Err(InputError::MissingIdentity("subject"));
        }
        let created_at = self
            .created_at
            .ok_or(InputError::MissingIdentity("created_at"))?;

        // A changed record must land on a new path, so the last edit wins
        let stamp = self.updated_at.unwrap_or(created_at).max(created_at);

        Ok(ArtifactIdentity {
            kind,
            id,
            subject_name,
            stamp,
            revision: self.revision,
        })
    }
}

/// One blood-pressure reading row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpReading {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Systolic/diastolic as entered, e.g. "120/80"
    pub value: String,
    /// Signed off / flagged by the recording nurse
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureChart {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub recorded_by: Option<Staff>,
    #[serde(default)]
    pub readings: Vec<BpReading>,
    #[serde(default)]
    pub maintenance_medication: Option<String>,
    #[serde(default)]
    pub hypertensive: bool,
    #[serde(default)]
    pub diabetic: bool,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub attended_by: Option<Staff>,
    #[serde(default)]
    pub reported_by: Option<String>,
    #[serde(default)]
    pub incident_date: Option<NaiveDate>,
    #[serde(default)]
    pub incident_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub nature_of_incident: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub first_aid_given: bool,
    #[serde(default)]
    pub referred_to_hospital: bool,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub witnesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReferral {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub physician: Option<Staff>,
    #[serde(default)]
    pub cbc: bool,
    #[serde(default)]
    pub urinalysis: bool,
    #[serde(default)]
    pub fecalysis: bool,
    #[serde(default)]
    pub chest_xray: bool,
    #[serde(default)]
    pub blood_typing: bool,
    #[serde(default)]
    pub fbs: bool,
    #[serde(default)]
    pub lipid_profile: bool,
    #[serde(default)]
    pub ecg: bool,
    #[serde(default)]
    pub other_tests: Option<String>,
    #[serde(default)]
    pub clinical_impression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralReferral {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub physician: Option<Staff>,
    #[serde(default)]
    pub referred_to: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub findings: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment_given: Option<String>,
    #[serde(default)]
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCertificate {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub physician: Option<Staff>,
    #[serde(default)]
    pub consultation_date: Option<NaiveDate>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub rest_days: Option<u32>,
    #[serde(default)]
    pub fit_to_resume: bool,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DentalCertificate {
    #[serde(flatten)]
    pub header: RecordHeader,
    #[serde(default)]
    pub dentist: Option<Staff>,
    #[serde(default)]
    pub examination_date: Option<NaiveDate>,
    #[serde(default)]
    pub procedures: Vec<String>,
    #[serde(default)]
    pub oral_prophylaxis: bool,
    #[serde(default)]
    pub extraction: bool,
    #[serde(default)]
    pub restoration: bool,
    #[serde(default)]
    pub sealant: bool,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// A clinical-encounter record, tagged by form kind
///
/// # Examples
///
/// ```
/// use clinidoc::domain::{EncounterRecord, FormKind};
///
/// let json = r#"{
///     "kind": "medical_certificate",
///     "id": 3,
///     "subject": {"first_name": "Ana", "last_name": "Reyes"},
///     "created_at": "2024-03-01T08:00:00Z",
///     "fit_to_resume": true
/// }"#;
/// let record = EncounterRecord::from_json(json).unwrap();
/// assert_eq!(record.kind(), FormKind::MedicalCertificate);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncounterRecord {
    BloodPressureChart(BloodPressureChart),
    IncidentReport(IncidentReport),
    LabReferral(LabReferral),
    GeneralReferral(GeneralReferral),
    MedicalCertificate(MedicalCertificate),
    DentalCertificate(DentalCertificate),
}

impl EncounterRecord {
    /// Decode a record from its JSON representation
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidRecord`] if the JSON does not match any
    /// record kind.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        serde_json::from_str(json).map_err(|e| InputError::InvalidRecord(e.to_string()))
    }

    /// The record's form kind
    pub fn kind(&self) -> FormKind {
        match self {
            EncounterRecord::BloodPressureChart(_) => FormKind::BloodPressureChart,
            EncounterRecord::IncidentReport(_) => FormKind::IncidentReport,
            EncounterRecord::LabReferral(_) => FormKind::LabReferral,
            EncounterRecord::GeneralReferral(_) => FormKind::GeneralReferral,
            EncounterRecord::MedicalCertificate(_) => FormKind::MedicalCertificate,
            EncounterRecord::DentalCertificate(_) => FormKind::DentalCertificate,
        }
    }

    /// Shared header fields
    pub fn header(&self) -> &RecordHeader {
        match self {
            EncounterRecord::BloodPressureChart(r) => &r.header,
            EncounterRecord::IncidentReport(r) => &r.header,
            EncounterRecord::LabReferral(r) => &r.header,
            EncounterRecord::GeneralReferral(r) => &r.header,
            EncounterRecord::MedicalCertificate(r) => &r.header,
            EncounterRecord::DentalCertificate(r) => &r.header,
        }
    }

    /// Identity tuple for artifact naming
    pub fn identity(&self) -> Result<ArtifactIdentity, InputError> {
        self.header().identity(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn subject() -> Subject {
        Subject {
            first_name: "Maria".to_string(),
            middle_name: Some("Luna".to_string()),
            last_name: "Santos".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_name_with_middle_initial() {
        assert_eq!(subject().full_name(), "Maria L. Santos");
    }

    #[test]
    fn test_full_name_without_middle() {
        let s = Subject {
            middle_name: Some("  ".to_string()),
            ..subject()
        };
        assert_eq!(s.full_name(), "Maria Santos");
    }

    #[test]
    fn test_signature_name() {
        let staff = Staff {
            first_name: "Jose".to_string(),
            last_name: "Rizal".to_string(),
            title: Some("MD".to_string()),
            ..Default::default()
        };
        assert_eq!(staff.signature_name(), "Jose Rizal, MD");
    }

    #[test]
    fn test_identity_requires_triplet() {
        let mut header = RecordHeader {
            id: Some(RecordId::new(1).unwrap()),
            subject: Some(subject()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        };
        assert!(header.identity(FormKind::LabReferral).is_ok());

        header.created_at = None;
        assert!(matches!(
            header.identity(FormKind::LabReferral),
            Err(InputError::MissingIdentity("created_at"))
        ));

        header.subject = None;
        assert!(matches!(
            header.identity(FormKind::LabReferral),
            Err(InputError::MissingIdentity("subject"))
        ));
    }

    #[test]
    fn test_identity_blank_subject_name() {
        let header = RecordHeader {
            id: Some(RecordId::new(1).unwrap()),
            subject: Some(Subject::default()),
            created_at: Some(Utc::now()),
            ..Default::default()
        };
        assert!(matches!(
            header.identity(FormKind::IncidentReport),
            Err(InputError::MissingIdentity("subject"))
        ));
    }

    #[test]
    fn test_identity_uses_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let header = RecordHeader {
            id: Some(RecordId::new(9).unwrap()),
            subject: Some(subject()),
            created_at: Some(created),
            updated_at: Some(updated),
            revision: None,
        };
        assert_eq!(header.identity(FormKind::LabReferral).unwrap().stamp, updated);
    }

    #[test]
    fn test_decode_blood_pressure_chart() {
        let json = r#"{
            "kind": "blood_pressure_chart",
            "id": 11,
            "subject": {"first_name": "Maria", "last_name": "Santos"},
            "created_at": "2024-05-06T07:08:09Z",
            "readings": [
                {"date": "2024-05-06", "time": "08:30:00", "value": "120/80"}
            ]
        }"#;
        let record = EncounterRecord::from_json(json).unwrap();
        assert_eq!(record.kind(), FormKind::BloodPressureChart);
        match record {
            EncounterRecord::BloodPressureChart(chart) => {
                assert_eq!(chart.readings.len(), 1);
                assert!(!chart.readings[0].flagged);
                assert_eq!(chart.header.id.unwrap().get(), 11);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_decode_unknown_kind() {
        let json = r#"{"kind": "prescription", "id": 1}"#;
        assert!(matches!(
            EncounterRecord::from_json(json),
            Err(InputError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_decode_missing_identity_is_detectable() {
        let json = r#"{"kind": "lab_referral", "cbc": true}"#;
        let record = EncounterRecord::from_json(json).unwrap();
        assert!(matches!(
            record.identity(),
            Err(InputError::MissingIdentity("id"))
        ));
    }
}
