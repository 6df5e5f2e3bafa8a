//! Blood-pressure monitoring chart

use super::derive::staff_name;
use super::{map_common, FieldTable, MappingContext};
use crate::domain::{BloodPressureChart, BpReading};

pub const PLACEHOLDERS: &[&str] = &[
    "medication",
    "hypertensive",
    "diabetic",
    "remarks",
    "recorded_by",
    "recorded_by_license",
];

/// Row placeholders, in column order; `reading_d` anchors the cloned row
pub const READING_COLUMNS: &[&str] = &[
    "reading_d",
    "reading_t",
    "reading_bp",
    "reading_s",
    "reading_r",
];

pub const READING_ANCHOR: &str = "reading_d";

pub fn map(record: &BloodPressureChart, ctx: &MappingContext) -> FieldTable {
    let mut fields = map_common(&record.header, ctx);

    fields.text_or_na("medication", record.maintenance_medication.as_deref());
    fields.checkbox("hypertensive", record.hypertensive);
    fields.checkbox("diabetic", record.diabetic);
    fields.text("remarks", record.remarks.as_deref());
    fields.set("recorded_by", staff_name(record.recorded_by.as_ref()));
    fields.text(
        "recorded_by_license",
        record
            .recorded_by
            .as_ref()
            .and_then(|s| s.license_number.as_deref()),
    );

    fields
}

/// One table per reading, in entry order
pub fn reading_rows(record: &BloodPressureChart) -> Vec<FieldTable> {
    record.readings.iter().map(reading_row).collect()
}

fn reading_row(reading: &BpReading) -> FieldTable {
    let mut row = FieldTable::new();
    row.set("reading_d", reading.date.format("%m/%d/%Y").to_string());
    row.set("reading_t", reading.time.format("%I:%M %p").to_string());
    row.text("reading_bp", Some(reading.value.as_str()));
    row.checkbox("reading_s", reading.flagged);
    row.text("reading_r", reading.remarks.as_deref());
    row
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assert_covers, bare_header, ctx};
    use super::*;
    use crate::domain::{FormKind, Staff};
    use chrono::{NaiveDate, NaiveTime};

    fn chart() -> BloodPressureChart {
        BloodPressureChart {
            header: bare_header(),
            recorded_by: None,
            readings: Vec::new(),
            maintenance_medication: None,
            hypertensive: false,
            diabetic: false,
            remarks: None,
        }
    }

    #[test]
    fn test_map_all_optional_absent() {
        let fields = map(&chart(), &ctx());
        assert_covers(&fields, FormKind::BloodPressureChart);
        assert_eq!(fields.get("medication"), Some("N/A"));
        assert_eq!(fields.get("hypertensive"), Some("☐"));
        assert_eq!(fields.get("recorded_by"), Some(""));
    }

    #[test]
    fn test_map_recorded_by() {
        let mut record = chart();
        record.hypertensive = true;
        record.recorded_by = Some(Staff {
            first_name: "Liza".to_string(),
            last_name: "Cruz".to_string(),
            title: Some("RN".to_string()),
            license_number: Some("0412345".to_string()),
            ..Default::default()
        });
        let fields = map(&record, &ctx());
        assert_eq!(fields.get("hypertensive"), Some("☑"));
        assert_eq!(fields.get("recorded_by"), Some("Liza Cruz, RN"));
        assert_eq!(fields.get("recorded_by_license"), Some("0412345"));
    }

    #[test]
    fn test_reading_rows_preserve_order_and_columns() {
        let mut record = chart();
        for (i, value) in ["120/80", "130/85", "118/76"].iter().enumerate() {
            record.readings.push(BpReading {
                date: NaiveDate::from_ymd_opt(2024, 6, 1 + i as u32).unwrap(),
                time: NaiveTime::from_hms_opt(14, 5, 0).unwrap(),
                value: value.to_string(),
                flagged: i == 1,
                remarks: None,
            });
        }

        let rows = reading_rows(&record);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("reading_bp"), Some("120/80"));
        assert_eq!(rows[1].get("reading_s"), Some("☑"));
        assert_eq!(rows[2].get("reading_d"), Some("06/03/2024"));
        assert_eq!(rows[2].get("reading_t"), Some("02:05 PM"));
        for row in &rows {
            for column in READING_COLUMNS {
                assert!(row.contains(column));
            }
        }
    }
}
