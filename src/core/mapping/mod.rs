//! Field mapping: encounter record → flat placeholder table
//!
//! Every mapper is total. Absent optional data becomes "N/A", an empty
//! string or an unchecked box; only the identity triplet (id, subject,
//! created_at) is allowed to fail, and that check happens once in
//! [`map_record`] before any kind-specific mapper runs.
//!
//! # Example
//!
//! ```rust
//! use clinidoc::core::mapping::{map_record, ClinicProfile, MappingContext};
//! use clinidoc::domain::EncounterRecord;
//! use chrono::NaiveDate;
//!
//! let record = EncounterRecord::from_json(r#"{
//!     "kind": "lab_referral",
//!     "id": 4,
//!     "subject": {"first_name": "Ana", "last_name": "Reyes"},
//!     "created_at": "2024-03-01T08:00:00Z",
//!     "cbc": true
//! }"#).unwrap();
//!
//! let ctx = MappingContext::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     ClinicProfile::named("University Health Services"),
//! );
//! let fields = map_record(&record, &ctx).unwrap();
//! assert_eq!(fields.get("cbc"), Some("☑"));
//! assert_eq!(fields.get("age"), Some("N/A"));
//! ```

pub mod blood_pressure;
pub mod certificate;
pub mod derive;
pub mod fields;
pub mod incident;
pub mod referral;

pub use fields::FieldTable;

use crate::config::ClinicConfig;
use crate::domain::{EncounterRecord, FormKind, RecordHeader, Result};
use chrono::NaiveDate;
use derive::{age_label, gender_label, program_college, subject_name, NOT_AVAILABLE};
use fields::LONG_DATE;

/// Placeholders every form kind carries in its header block
pub const COMMON_PLACEHOLDERS: &[&str] = &[
    "clinic_name",
    "clinic_address",
    "clinic_contact",
    "physician_in_charge",
    "physician_license",
    "record_no",
    "date_created",
    "name",
    "age",
    "gender",
    "birthdate",
    "program_college",
    "year_level",
    "id_number",
    "contact_number",
    "address",
];

/// Clinic letterhead data available to every mapper
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClinicProfile {
    pub name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub physician_in_charge: Option<String>,
    pub physician_license: Option<String>,
}

impl ClinicProfile {
    /// Profile with only a name
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

impl From<&ClinicConfig> for ClinicProfile {
    fn from(config: &ClinicConfig) -> Self {
        Self {
            name: config.name.clone(),
            address: config.address.clone(),
            contact_number: config.contact_number.clone(),
            physician_in_charge: config.physician_in_charge.clone(),
            physician_license: config.physician_license.clone(),
        }
    }
}

/// Related lookups the mappers need beyond the record itself
///
/// "Today" is injected so mapping stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct MappingContext {
    pub today: NaiveDate,
    pub clinic: ClinicProfile,
}

impl MappingContext {
    pub fn new(today: NaiveDate, clinic: ClinicProfile) -> Self {
        Self { today, clinic }
    }
}

/// Map a record to its flat placeholder table
///
/// # Errors
///
/// Returns an input error only when the identity triplet is incomplete.
pub fn map_record(record: &EncounterRecord, ctx: &MappingContext) -> Result<FieldTable> {
    record.identity()?;

    let fields = match record {
        EncounterRecord::BloodPressureChart(r) => blood_pressure::map(r, ctx),
        EncounterRecord::IncidentReport(r) => incident::map(r, ctx),
        EncounterRecord::LabReferral(r) => referral::map_lab(r, ctx),
        EncounterRecord::GeneralReferral(r) => referral::map_general(r, ctx),
        EncounterRecord::MedicalCertificate(r) => certificate::map_medical(r, ctx),
        EncounterRecord::DentalCertificate(r) => certificate::map_dental(r, ctx),
    };
    Ok(fields)
}

/// Per-row tables for kinds that have a repeating region
pub fn repeating_items(record: &EncounterRecord) -> Option<Vec<FieldTable>> {
    match record {
        EncounterRecord::BloodPressureChart(r) => Some(blood_pressure::reading_rows(r)),
        _ => None,
    }
}

/// Scalar placeholders declared for a kind (common header included)
pub fn placeholders_for(kind: FormKind) -> Vec<&'static str> {
    let specific = match kind {
        FormKind::BloodPressureChart => blood_pressure::PLACEHOLDERS,
        FormKind::IncidentReport => incident::PLACEHOLDERS,
        FormKind::LabReferral => referral::LAB_PLACEHOLDERS,
        FormKind::GeneralReferral => referral::GENERAL_PLACEHOLDERS,
        FormKind::MedicalCertificate => certificate::MEDICAL_PLACEHOLDERS,
        FormKind::DentalCertificate => certificate::DENTAL_PLACEHOLDERS,
    };
    COMMON_PLACEHOLDERS
        .iter()
        .chain(specific.iter())
        .copied()
        .collect()
}

/// Header block shared by every form
pub(crate) fn map_common(header: &RecordHeader, ctx: &MappingContext) -> FieldTable {
    let mut fields = FieldTable::new();
    let clinic = &ctx.clinic;
    let subject = header.subject.as_ref();

    fields.set("clinic_name", clinic.name.trim());
    fields.text("clinic_address", clinic.address.as_deref());
    fields.text("clinic_contact", clinic.contact_number.as_deref());
    fields.text("physician_in_charge", clinic.physician_in_charge.as_deref());
    fields.text("physician_license", clinic.physician_license.as_deref());

    fields.set(
        "record_no",
        header
            .id
            .map(|id| format!("{:06}", id.get()))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    match header.created_at {
        Some(created) => fields.set("date_created", created.format(LONG_DATE).to_string()),
        None => fields.set("date_created", NOT_AVAILABLE),
    }

    fields.set("name", subject_name(subject));
    let birthdate = subject.and_then(|s| s.birthdate);
    fields.set("age", age_label(birthdate, ctx.today));
    fields.set("gender", gender_label(subject.and_then(|s| s.is_male)));
    fields.date("birthdate", birthdate);
    fields.set(
        "program_college",
        program_college(
            subject.and_then(|s| s.program.as_deref()),
            subject.and_then(|s| s.college.as_deref()),
        ),
    );
    fields.text_or_na("year_level", subject.and_then(|s| s.year_level.as_deref()));
    fields.text_or_na("id_number", subject.and_then(|s| s.id_number.as_deref()));
    fields.text_or_na(
        "contact_number",
        subject.and_then(|s| s.contact_number.as_deref()),
    );
    fields.text_or_na("address", subject.and_then(|s| s.address.as_deref()));

    fields
}
