//! Flat placeholder → value table
//!
//! Mappers fill a [`FieldTable`] through typed inserters so every kind
//! applies the same defaults for absent data.

use super::derive::{checkbox, yes_blank, NOT_AVAILABLE};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Long date format used on printed forms, e.g. "March 01, 2024"
pub const LONG_DATE: &str = "%B %d, %Y";

/// Ordered key/value table of template placeholders
///
/// # Examples
///
/// ```
/// use clinidoc::core::mapping::FieldTable;
///
/// let mut fields = FieldTable::new();
/// fields.text_or_na("diagnosis", None);
/// fields.checkbox("urgent", true);
/// assert_eq!(fields.get("diagnosis"), Some("N/A"));
/// assert_eq!(fields.get("urgent"), Some("☑"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable(BTreeMap<String, String>);

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A row of empty strings for the given column names
    pub fn blank<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut table = Self::new();
        for column in columns {
            table.set(column.as_ref(), "");
        }
        table
    }

    /// Insert a raw value, replacing any previous one
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Trimmed text, empty when absent
    pub fn text(&mut self, key: &str, value: Option<&str>) {
        self.set(key, value.map(str::trim).unwrap_or_default());
    }

    /// Trimmed text, "N/A" when absent or blank
    pub fn text_or_na(&mut self, key: &str, value: Option<&str>) {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        self.set(key, value.unwrap_or(NOT_AVAILABLE));
    }

    /// Long-format date, "N/A" when absent
    pub fn date(&mut self, key: &str, value: Option<NaiveDate>) {
        match value {
            Some(date) => self.set(key, date.format(LONG_DATE).to_string()),
            None => self.set(key, NOT_AVAILABLE),
        }
    }

    /// Checkbox glyph
    pub fn checkbox(&mut self, key: &str, value: bool) {
        self.set(key, checkbox(value));
    }

    /// "Yes" or empty
    pub fn yes_blank(&mut self, key: &str, value: bool) {
        self.set(key, yes_blank(value));
    }

    /// Non-blank items joined with `separator`, "N/A" when none remain
    pub fn joined(&mut self, key: &str, items: &[String], separator: &str) {
        let parts: Vec<&str> = items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.set(key, NOT_AVAILABLE);
        } else {
            self.set(key, parts.join(separator));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every value is empty
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_trims_and_defaults_empty() {
        let mut fields = FieldTable::new();
        fields.text("a", Some("  hello "));
        fields.text("b", None);
        assert_eq!(fields.get("a"), Some("hello"));
        assert_eq!(fields.get("b"), Some(""));
    }

    #[test]
    fn test_text_or_na_blank_is_na() {
        let mut fields = FieldTable::new();
        fields.text_or_na("a", Some("   "));
        assert_eq!(fields.get("a"), Some("N/A"));
    }

    #[test]
    fn test_date_format() {
        let mut fields = FieldTable::new();
        fields.date("d", NaiveDate::from_ymd_opt(2024, 3, 1));
        fields.date("e", None);
        assert_eq!(fields.get("d"), Some("March 01, 2024"));
        assert_eq!(fields.get("e"), Some("N/A"));
    }

    #[test]
    fn test_joined_skips_blanks() {
        let mut fields = FieldTable::new();
        fields.joined(
            "j",
            &["Extraction".to_string(), " ".to_string(), "Cleaning".to_string()],
            ", ",
        );
        fields.joined("k", &[], ", ");
        assert_eq!(fields.get("j"), Some("Extraction, Cleaning"));
        assert_eq!(fields.get("k"), Some("N/A"));
    }

    #[test]
    fn test_blank_row() {
        let row = FieldTable::blank(&["x", "y"]);
        assert_eq!(row.len(), 2);
        assert!(row.is_blank());
    }
}
