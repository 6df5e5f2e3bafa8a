//! Medical and dental certificates

use super::derive::staff_name;
use super::{map_common, FieldTable, MappingContext};
use crate::domain::{DentalCertificate, MedicalCertificate};

pub const MEDICAL_PLACEHOLDERS: &[&str] = &[
    "consultation_date",
    "diagnosis",
    "recommendation",
    "rest_days",
    "fit_to_resume",
    "purpose",
    "physician",
    "physician_license_no",
];

pub const DENTAL_PLACEHOLDERS: &[&str] = &[
    "examination_date",
    "procedures",
    "oral_prophylaxis",
    "extraction",
    "restoration",
    "sealant",
    "remarks",
    "purpose",
    "dentist",
    "dentist_license_no",
];

pub fn map_medical(record: &MedicalCertificate, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    // Certificates default the consultation date to the day the record was made
    let consultation = record
        .consultation_date
        .or_else(|| record.header.created_at.map(|c| c.date_naive()));
    fields.date("consultation_date", consultation);
    fields.text_or_na("diagnosis", record.diagnosis.as_deref());
    fields.text_or_na("recommendation", record.recommendation.as_deref());
    fields.set(
        "rest_days",
        match record.rest_days {
            Some(1) => "1 day".to_string(),
            Some(days) if days > 1 => format!("{days} days"),
            _ => String::new(),
        },
    );
    fields.yes_blank("fit_to_resume", record.fit_to_resume);
    fields.text_or_na("purpose", record.purpose.as_deref());
    fields.set("physician", staff_name(record.physician.as_ref()));
    fields.text(
        "physician_license_no",
        record
            .physician
            .as_ref()
            .and_then(|p| p.license_number.as_deref()),
    );

    fields
}

pub fn map_dental(record: &DentalCertificate, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    let examined = record
        .examination_date
        .or_else(|| record.header.created_at.map(|c| c.date_naive()));
    fields.date("examination_date", examined);
    fields.joined("procedures", &record.procedures, ", ");
    fields.checkbox("oral_prophylaxis", record.oral_prophylaxis);
    fields.checkbox("extraction", record.extraction);
    fields.checkbox("restoration", record.restoration);
    fields.checkbox("sealant", record.sealant);
    fields.text("remarks", record.remarks.as_deref());
    fields.text_or_na("purpose", record.purpose.as_deref());
    fields.set("dentist", staff_name(record.dentist.as_ref()));
    fields.text(
        "dentist_license_no",
        record
            .dentist
            .as_ref()
            .and_then(|d| d.license_number.as_deref()),
    );

    fields
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_covers, bare_header, ctx};
    use super::*;
    use crate::domain::FormKind;
    use test_case::test_case;

    fn medical() -> MedicalCertificate {
        MedicalCertificate {
            header: bare_header(),
            physician: None,
            consultation_date: None,
            diagnosis: None,
            recommendation: None,
            rest_days: None,
            fit_to_resume: false,
            purpose: None,
        }
    }

    fn dental() -> DentalCertificate {
        DentalCertificate {
            header: bare_header(),
            dentist: None,
            examination_date: None,
            procedures: Vec::new(),
            oral_prophylaxis: false,
            extraction: false,
            restoration: false,
            sealant: false,
            remarks: None,
            purpose: None,
        }
    }

    #[test]
    fn test_medical_all_optional_absent() {
        let fields = map_medical(&medical(), &ctx());
        assert_covers(&fields, FormKind::MedicalCertificate);
        assert_eq!(fields.get("consultation_date"), Some("June 01, 2024"));
        assert_eq!(fields.get("fit_to_resume"), Some(""));
        assert_eq!(fields.get("rest_days"), Some(""));
    }

    #[test_case(Some(0), "" ; "zero days")]
    #[test_case(Some(1), "1 day" ; "one day")]
    #[test_case(Some(3), "3 days" ; "several days")]
    fn test_medical_rest_days(rest_days: Option<u32>, expected: &str) {
        let mut record = medical();
        record.rest_days = rest_days;
        let fields = map_medical(&record, &ctx());
        assert_eq!(fields.get("rest_days"), Some(expected));
    }

    #[test]
    fn test_dental_all_optional_absent() {
        let fields = map_dental(&dental(), &ctx());
        assert_covers(&fields, FormKind::DentalCertificate);
        assert_eq!(fields.get("procedures"), Some("N/A"));
        assert_eq!(fields.get("extraction"), Some("☐"));
    }

    #[test]
    fn test_dental_procedures_joined() {
        let mut record = dental();
        record.procedures = vec!["Oral prophylaxis".to_string(), "Fluoride".to_string()];
        record.oral_prophylaxis = true;
        let fields = map_dental(&record, &ctx());
        assert_eq!(fields.get("procedures"), Some("Oral prophylaxis, Fluoride"));
        assert_eq!(fields.get("oral_prophylaxis"), Some("☑"));
    }
}
