//! Repeating-region expansion
//!
//! Turns a variable-length list of row tables into the exact row set the
//! template's cloned region will render.

use crate::core::mapping::FieldTable;
use crate::domain::errors::InputError;
use crate::domain::{FormKind, RepeatingRegion, Result};

/// Pad `items` with blank rows up to the region's minimum
///
/// Real rows keep their order and are never dropped. An empty input yields
/// exactly `min_rows` blank rows so the region still renders.
///
/// # Errors
///
/// Returns [`InputError::CapacityExceeded`] when there are more items than
/// the layout can hold.
///
/// # Examples
///
/// ```
/// use clinidoc::core::render::expand;
/// use clinidoc::domain::{FormKind, RepeatingRegion};
///
/// let region = RepeatingRegion::new("reading_d", &["reading_d", "reading_bp"], 11, 31);
/// let rows = expand(FormKind::BloodPressureChart, Vec::new(), &region).unwrap();
/// assert_eq!(rows.len(), 11);
/// assert!(rows.iter().all(|r| r.is_blank()));
/// ```
pub fn expand(
    kind: FormKind,
    items: Vec<FieldTable>,
    region: &RepeatingRegion,
) -> Result<Vec<FieldTable>> {
    if items.len() > region.max_rows {
        return Err(InputError::CapacityExceeded {
            kind,
            rows: items.len(),
            max: region.max_rows,
        }
        .into());
    }

    let target = items.len().max(region.min_rows);
    let mut rows = Vec::with_capacity(target);
    for item in items {
        // Columns the item omits render blank instead of as raw placeholders
        let mut row = FieldTable::blank(&region.columns);
        for (key, value) in item.iter() {
            row.set(key, value);
        }
        rows.push(row);
    }
    while rows.len() < target {
        rows.push(FieldTable::blank(&region.columns));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ClinidocError;

    fn region() -> RepeatingRegion {
        RepeatingRegion::new("reading_d", &["reading_d", "reading_bp"], 11, 31)
    }

    fn item(n: usize) -> FieldTable {
        let mut row = FieldTable::new();
        row.set("reading_d", format!("06/{n:02}/2024"));
        row.set("reading_bp", "120/80");
        row
    }

    #[test]
    fn test_expand_empty_yields_min_blank_rows() {
        let rows = expand(FormKind::BloodPressureChart, Vec::new(), &region()).unwrap();
        assert_eq!(rows.len(), 11);
        for row in &rows {
            assert!(row.is_blank());
            assert!(row.contains("reading_d"));
            assert!(row.contains("reading_bp"));
        }
    }

    #[test]
    fn test_expand_pads_after_real_rows_in_order() {
        let items: Vec<_> = (1..=5).map(item).collect();
        let rows = expand(FormKind::BloodPressureChart, items, &region()).unwrap();
        assert_eq!(rows.len(), 11);
        for (i, row) in rows.iter().take(5).enumerate() {
            assert_eq!(row.get("reading_d"), Some(format!("06/{:02}/2024", i + 1).as_str()));
        }
        assert!(rows[5..].iter().all(FieldTable::is_blank));
    }

    #[test]
    fn test_expand_never_truncates_above_min() {
        let items: Vec<_> = (1..=20).map(item).collect();
        let rows = expand(FormKind::BloodPressureChart, items, &region()).unwrap();
        assert_eq!(rows.len(), 20);
        assert!(!rows.iter().any(FieldTable::is_blank));
    }

    #[test]
    fn test_expand_at_capacity_is_accepted() {
        let items: Vec<_> = (1..=31).map(item).collect();
        assert_eq!(
            expand(FormKind::BloodPressureChart, items, &region())
                .unwrap()
                .len(),
            31
        );
    }

    #[test]
    fn test_expand_over_capacity_fails_loudly() {
        let items: Vec<_> = (1..=32).map(item).collect();
        let err = expand(FormKind::BloodPressureChart, items, &region()).unwrap_err();
        assert!(matches!(
            err,
            ClinidocError::Input(InputError::CapacityExceeded { rows: 32, max: 31, .. })
        ));
    }

    #[test]
    fn test_expand_fills_missing_columns() {
        let mut partial = FieldTable::new();
        partial.set("reading_bp", "110/70");
        let rows = expand(FormKind::BloodPressureChart, vec![partial], &region()).unwrap();
        assert_eq!(rows[0].get("reading_d"), Some(""));
        assert_eq!(rows[0].get("reading_bp"), Some("110/70"));
    }
}
