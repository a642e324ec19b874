//! Parsing of operator-entered quantities into batches.

use tracker_domain::{Batch, Category, Family, WarrantyType};

use crate::CoreError;

/// Parses a unit quantity. Blank input counts as zero.
///
/// Negative, fractional, and non-numeric input is rejected rather than clamped.
pub fn parse_quantity(raw: &str) -> Result<u64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value < 0.0 => Err(CoreError::Validation(format!(
            "`{}` is negative; quantities must be zero or more",
            trimmed
        ))),
        Ok(value) if value.fract() != 0.0 => Err(CoreError::Validation(format!(
            "`{}` is not a whole number",
            trimmed
        ))),
        Ok(_) if !trimmed.starts_with('-') && trimmed.chars().all(|c| c.is_ascii_digit()) => {
            Err(CoreError::Overflow)
        }
        _ => Err(CoreError::Validation(format!(
            "`{}` is not a valid quantity",
            trimmed
        ))),
    }
}

fn split_entry(entry: &str) -> Result<(&str, &str), CoreError> {
    entry
        .split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            CoreError::Validation(format!("`{}` must look like `name=quantity`", entry.trim()))
        })
}

fn insert_unique(batch: &mut Batch, category: Category, quantity: u64) -> Result<(), CoreError> {
    if batch.contains(category) {
        return Err(CoreError::Validation(format!(
            "{} was entered more than once",
            category
        )));
    }
    batch.set(category, quantity);
    Ok(())
}

/// Parses `warranty=quantity` entries for a single family, e.g. `qm=2 flat=3`.
pub fn parse_family_quantities(family: Family, entries: &[&str]) -> Result<Batch, CoreError> {
    let mut batch = Batch::new();
    for entry in entries {
        let (warranty, quantity) = split_entry(entry)?;
        let warranty: WarrantyType = warranty.parse()?;
        let category = Category::resolve(family, warranty)?;
        insert_unique(&mut batch, category, parse_quantity(quantity)?)?;
    }
    Ok(batch)
}

/// Parses a full breakdown assignment, e.g. `525:qm=2 count_1025_flat=3`.
pub fn parse_assignment(entries: &[&str]) -> Result<Batch, CoreError> {
    let mut batch = Batch::new();
    for entry in entries {
        let (name, quantity) = split_entry(entry)?;
        let category: Category = name.parse()?;
        insert_unique(&mut batch, category, parse_quantity(quantity)?)?;
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_accept_blank_and_whole_numbers() {
        assert_eq!(parse_quantity("").unwrap(), 0);
        assert_eq!(parse_quantity("   ").unwrap(), 0);
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
    }

    #[test]
    fn quantities_reject_negative_fractional_and_garbage() {
        for raw in ["-1", "-0.5", "2.5", "abc", "1e3x"] {
            let err = parse_quantity(raw).expect_err(raw);
            assert!(matches!(err, CoreError::Validation(_)), "{raw}: {err:?}");
        }
        assert!(parse_quantity("-3")
            .unwrap_err()
            .to_string()
            .contains("negative"));
    }

    #[test]
    fn oversized_quantity_reports_overflow() {
        let err = parse_quantity("99999999999999999999999").unwrap_err();
        assert!(matches!(err, CoreError::Overflow));
    }

    #[test]
    fn family_entries_resolve_aliases() {
        let batch = parse_family_quantities(Family::Model525, &["qm=2", "flat= 3", "pm="]).unwrap();
        assert_eq!(batch.get(Category::Model525QmWarranty), 2);
        assert_eq!(batch.get(Category::Model525FlatRate), 3);
        assert_eq!(batch.get(Category::Model525Pm), 0);
        assert_eq!(batch.total(), Some(5));
    }

    #[test]
    fn family_entries_reject_unsupported_warranty() {
        let err = parse_family_quantities(Family::Stratus, &["qm=1"]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let err = parse_family_quantities(Family::M10, &["flat=1", "f=2"]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn assignment_accepts_field_names_and_pairs() {
        let batch = parse_assignment(&["count_stratus_flat=4", "1025:minor=1"]).unwrap();
        assert_eq!(batch.get(Category::StratusFlatRate), 4);
        assert_eq!(batch.get(Category::Model1025MinorRepair), 1);
    }

    #[test]
    fn assignment_requires_name_and_quantity() {
        assert!(parse_assignment(&["count_qm"]).is_err());
        assert!(parse_assignment(&["=3"]).is_err());
    }
}
