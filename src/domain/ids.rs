//! Domain identifier types with validation
//!
//! Newtype wrappers and the closed set of form kinds the pipeline knows how
//! to render.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record identifier newtype wrapper
///
/// Encounter records are keyed by a positive integer assigned by the
/// persistence layer.
///
/// # Examples
///
/// ```
/// use clinidoc::domain::ids::RecordId;
///
/// let id = RecordId::new(42).unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(RecordId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RecordId(u64);

impl RecordId {
    /// Creates a new RecordId, rejecting zero
    pub fn new(id: u64) -> Result<Self, String> {
        if id == 0 {
            return Err("Record ID must be positive".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the raw numeric id
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for RecordId {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for u64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid record ID: {s}"))?;
        Self::new(id)
    }
}

/// The kinds of clinical form the pipeline can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Blood-pressure monitoring chart with a list of readings
    BloodPressureChart,
    /// Clinic incident report
    IncidentReport,
    /// Laboratory referral slip
    LabReferral,
    /// Referral to another facility or specialist
    GeneralReferral,
    /// Medical certificate
    MedicalCertificate,
    /// Dental certificate
    DentalCertificate,
}

impl FormKind {
    /// Every kind, in registry order
    pub const ALL: [FormKind; 6] = [
        FormKind::BloodPressureChart,
        FormKind::IncidentReport,
        FormKind::LabReferral,
        FormKind::GeneralReferral,
        FormKind::MedicalCertificate,
        FormKind::DentalCertificate,
    ];

    /// Short, filesystem-safe name used in artifact and template file names
    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::BloodPressureChart => "bp_chart",
            FormKind::IncidentReport => "incident_report",
            FormKind::LabReferral => "lab_referral",
            FormKind::GeneralReferral => "referral",
            FormKind::MedicalCertificate => "medical_certificate",
            FormKind::DentalCertificate => "dental_certificate",
        }
    }

    /// Serde tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::BloodPressureChart => "blood_pressure_chart",
            FormKind::IncidentReport => "incident_report",
            FormKind::LabReferral => "lab_referral",
            FormKind::GeneralReferral => "general_referral",
            FormKind::MedicalCertificate => "medical_certificate",
            FormKind::DentalCertificate => "dental_certificate",
        }
    }

    /// Human-readable label, used for suggested download names
    pub fn label(&self) -> &'static str {
        match self {
            FormKind::BloodPressureChart => "BP-Chart",
            FormKind::IncidentReport => "Incident-Report",
            FormKind::LabReferral => "Laboratory-Referral",
            FormKind::GeneralReferral => "Referral",
            FormKind::MedicalCertificate => "Medical-Certificate",
            FormKind::DentalCertificate => "Dental-Certificate",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        FormKind::ALL
            .into_iter()
            .find(|k| k.as_str() == needle || k.slug() == needle)
            .ok_or_else(|| format!("Unknown form kind: {s}"))
    }
}
