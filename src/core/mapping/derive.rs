//! Derived field helpers shared by every mapper

use crate::domain::{Staff, Subject};
use chrono::{Datelike, NaiveDate};

/// Placeholder default for absent optional data
pub const NOT_AVAILABLE: &str = "N/A";

pub const CHECKED: &str = "☑";
pub const UNCHECKED: &str = "☐";

/// Checkbox glyph for a boolean field
pub fn checkbox(value: bool) -> &'static str {
    if value {
        CHECKED
    } else {
        UNCHECKED
    }
}

/// "Yes" for true, empty for false
pub fn yes_blank(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        ""
    }
}

/// Whole years between `birthdate` and `today`
///
/// Returns `None` for a birthdate in the future.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birthdate > today {
        return None;
    }
    let mut years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Age as printed, "N/A" when unknown
pub fn age_label(birthdate: Option<NaiveDate>, today: NaiveDate) -> String {
    birthdate
        .and_then(|b| age_on(b, today))
        .map(|age| age.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// "Male" / "Female" / "N/A"
pub fn gender_label(is_male: Option<bool>) -> &'static str {
    match is_male {
        Some(true) => "Male",
        Some(false) => "Female",
        None => NOT_AVAILABLE,
    }
}

/// "PROGRAM / COLLEGE" composite, either half may be missing
pub fn program_college(program: Option<&str>, college: Option<&str>) -> String {
    let parts: Vec<String> = [program, college]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_uppercase)
        .collect();

    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(" / ")
    }
}

/// Subject full name or "N/A"
pub fn subject_name(subject: Option<&Subject>) -> String {
    subject
        .map(Subject::full_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Staff signature line or empty, so an unsigned form leaves the line blank
pub fn staff_name(staff: Option<&Staff>) -> String {
    staff.map(Staff::signature_name).unwrap_or_default()
}
