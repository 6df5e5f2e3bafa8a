//! Incident report

use super::derive::{staff_name, NOT_AVAILABLE};
use super::{map_common, FieldTable, MappingContext};
use crate::domain::IncidentReport;

pub const PLACEHOLDERS: &[&str] = &[
    "incident_date",
    "incident_time",
    "location",
    "nature",
    "description",
    "action_taken",
    "first_aid",
    "referred",
    "hospital",
    "witnesses",
    "reported_by",
    "attended_by",
    "attended_by_license",
];

pub fn map(record: &IncidentReport, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    fields.date("incident_date", record.incident_date);
    fields.set(
        "incident_time",
        record
            .incident_time
            .map(|t| t.format("%I:%M %p").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    fields.text_or_na("location", record.location.as_deref());
    fields.text_or_na("nature", record.nature_of_incident.as_deref());
    fields.text_or_na("description", record.description.as_deref());
    fields.text_or_na("action_taken", record.action_taken.as_deref());
    fields.checkbox("first_aid", record.first_aid_given);
    fields.checkbox("referred", record.referred_to_hospital);
    if record.referred_to_hospital {
        fields.text_or_na("hospital", record.hospital_name.as_deref());
    } else {
        fields.set("hospital", "");
    }
    fields.joined("witnesses", &record.witnesses, ", ");
    fields.text_or_na("reported_by", record.reported_by.as_deref());
    fields.set("attended_by", staff_name(record.attended_by.as_ref()));
    fields.text(
        "attended_by_license",
        record
            .attended_by
            .as_ref()
            .and_then(|s| s.license_number.as_deref()),
    );

    fields
}
