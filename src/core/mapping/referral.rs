//! Laboratory and general referrals
//!
//! Both slips share the physician signature block.

use super::derive::staff_name;
use super::{map_common, FieldTable, MappingContext};
use crate::domain::{GeneralReferral, LabReferral, Staff};

pub const LAB_PLACEHOLDERS: &[&str] = &[
    "cbc",
    "urinalysis",
    "fecalysis",
    "chest_xray",
    "blood_typing",
    "fbs",
    "lipid_profile",
    "ecg",
    "other_tests",
    "clinical_impression",
    "physician",
    "physician_license_no",
    "physician_ptr_no",
];

pub const GENERAL_PLACEHOLDERS: &[&str] = &[
    "referred_to",
    "reason",
    "chief_complaint",
    "findings",
    "diagnosis",
    "treatment_given",
    "urgent",
    "physician",
    "physician_license_no",
    "physician_ptr_no",
];

pub fn map_lab(record: &LabReferral, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    fields.checkbox("cbc", record.cbc);
    fields.checkbox("urinalysis", record.urinalysis);
    fields.checkbox("fecalysis", record.fecalysis);
    fields.checkbox("chest_xray", record.chest_xray);
    fields.checkbox("blood_typing", record.blood_typing);
    fields.checkbox("fbs", record.fbs);
    fields.checkbox("lipid_profile", record.lipid_profile);
    fields.checkbox("ecg", record.ecg);
    fields.text("other_tests", record.other_tests.as_deref());
    fields.text_or_na("clinical_impression", record.clinical_impression.as_deref());
    signature_block(&mut fields, record.physician.as_ref());

    fields
}

pub fn map_general(record: &GeneralReferral, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    fields.text_or_na("referred_to", record.referred_to.as_deref());
    fields.text_or_na("reason", record.reason.as_deref());
    fields.text_or_na("chief_complaint", record.chief_complaint.as_deref());
    fields.text_or_na("findings", record.findings.as_deref());
    fields.text_or_na("diagnosis", record.diagnosis.as_deref());
    fields.text_or_na("treatment_given", record.treatment_given.as_deref());
    fields.yes_blank("urgent", record.urgent);
    signature_block(&mut fields, record.physician.as_ref());

    fields
}

fn signature_block(fields: &mut FieldTable, physician: Option<&Staff>) {
    fields.set("physician", staff_name(physician));
    fields.text(
        "physician_license_no",
        physician.and_then(|p| p.license_number.as_deref()),
    );
    fields.text(
        "physician_ptr_no",
        physician.and_then(|p| p.ptr_number.as_deref()),
    );
}
