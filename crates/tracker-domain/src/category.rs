//! Unit families, warranty types, and the fixed point table that ties them together.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Product families the ledger tracks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Stratus,
    Homefill,
    Model525,
    Model1025,
    Perfecto2V,
    M10,
    RhythmLm5a,
    RhythmLm5ba,
    RhythmLm5ca,
    Poc,
}

impl Family {
    pub const ALL: [Family; 10] = [
        Family::Stratus,
        Family::Homefill,
        Family::Model525,
        Family::Model1025,
        Family::Perfecto2V,
        Family::M10,
        Family::RhythmLm5a,
        Family::RhythmLm5ba,
        Family::RhythmLm5ca,
        Family::Poc,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Family::Stratus => "Stratus",
            Family::Homefill => "Homefill",
            Family::Model525 => "525",
            Family::Model1025 => "1025",
            Family::Perfecto2V => "Perfecto 2V",
            Family::M10 => "M10",
            Family::RhythmLm5a => "Rhythm LM5A",
            Family::RhythmLm5ba => "Rhythm LM5BA",
            Family::RhythmLm5ca => "Rhythm LM5CA",
            Family::Poc => "POC",
        }
    }

    /// Categories belonging to this family, in schema order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::all().filter(move |category| category.family() == self)
    }

    /// Column that held the family aggregate before per-warranty tracking existed.
    pub fn legacy_total_field(self) -> Option<&'static str> {
        match self {
            Family::Stratus => Some("count_stratus"),
            Family::Homefill => Some("count_homefill"),
            _ => None,
        }
    }

    /// Short aliases accepted on the command line, primary alias first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Family::Stratus => &["stratus", "s"],
            Family::Homefill => &["homefill", "h"],
            Family::Model525 => &["525", "5"],
            Family::Model1025 => &["1025", "10"],
            Family::Perfecto2V => &["perfecto", "perfecto2v", "p2v"],
            Family::M10 => &["m10"],
            Family::RhythmLm5a => &["lm5a"],
            Family::RhythmLm5ba => &["lm5ba"],
            Family::RhythmLm5ca => &["lm5ca"],
            Family::Poc => &["poc"],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Family {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = normalize(value);
        Family::ALL
            .into_iter()
            .find(|family| {
                normalize(family.label()) == needle || family.aliases().contains(&needle.as_str())
            })
            .ok_or_else(|| ParseCategoryError::UnknownFamily(value.trim().to_string()))
    }
}

/// Warranty or work type a unit was serviced under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WarrantyType {
    QmWarranty,
    Pm,
    MinorRepair,
    FlatRate,
    ManufactureWarranty,
    Repair,
}

impl WarrantyType {
    pub const ALL: [WarrantyType; 6] = [
        WarrantyType::QmWarranty,
        WarrantyType::Pm,
        WarrantyType::MinorRepair,
        WarrantyType::FlatRate,
        WarrantyType::ManufactureWarranty,
        WarrantyType::Repair,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WarrantyType::QmWarranty => "QM Warranty",
            WarrantyType::Pm => "PM",
            WarrantyType::MinorRepair => "Minor Repair",
            WarrantyType::FlatRate => "Flat Rate",
            WarrantyType::ManufactureWarranty => "Manufacture Warranty",
            WarrantyType::Repair => "Repair",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            WarrantyType::QmWarranty => &["qm", "q"],
            WarrantyType::Pm => &["pm", "p"],
            WarrantyType::MinorRepair => &["minor", "m"],
            WarrantyType::FlatRate => &["flat", "f"],
            WarrantyType::ManufactureWarranty => &["manuf", "mw", "w"],
            WarrantyType::Repair => &["repair", "r"],
        }
    }
}

impl fmt::Display for WarrantyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WarrantyType {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = normalize(value);
        WarrantyType::ALL
            .into_iter()
            .find(|warranty| {
                normalize(warranty.label()) == needle
                    || warranty.aliases().contains(&needle.as_str())
            })
            .ok_or_else(|| ParseCategoryError::UnknownWarranty(value.trim().to_string()))
    }
}

/// A tracked counter: one valid (family, warranty type) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    StratusFlatRate,
    StratusManufactureWarranty,
    HomefillFlatRate,
    HomefillManufactureWarranty,
    Model525QmWarranty,
    Model525Pm,
    Model525MinorRepair,
    Model525FlatRate,
    Model525ManufactureWarranty,
    Model1025QmWarranty,
    Model1025Pm,
    Model1025MinorRepair,
    Model1025FlatRate,
    Model1025ManufactureWarranty,
    Perfecto2VQmWarranty,
    Perfecto2VFlatRate,
    Perfecto2VManufactureWarranty,
    M10QmWarranty,
    M10FlatRate,
    M10ManufactureWarranty,
    RhythmLm5aQmWarranty,
    RhythmLm5aFlatRate,
    RhythmLm5aManufactureWarranty,
    RhythmLm5baQmWarranty,
    RhythmLm5baFlatRate,
    RhythmLm5baManufactureWarranty,
    RhythmLm5caQmWarranty,
    RhythmLm5caFlatRate,
    RhythmLm5caManufactureWarranty,
    PocRepair,
}

/// Static attributes of a [`Category`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryInfo {
    pub category: Category,
    pub family: Family,
    pub warranty: WarrantyType,
    pub points: f64,
    pub field: &'static str,
}

const fn info(
    category: Category,
    family: Family,
    warranty: WarrantyType,
    points: f64,
    field: &'static str,
) -> CategoryInfo {
    CategoryInfo {
        category,
        family,
        warranty,
        points,
        field,
    }
}

use Category as C;
use Family as F;
use WarrantyType as W;

/// Point table, indexed by `Category` discriminant.
pub const SCHEMA: [CategoryInfo; 30] = [
    info(
        C::StratusFlatRate,
        F::Stratus,
        W::FlatRate,
        0.75,
        "count_stratus_flat",
    ),
    info(
        C::StratusManufactureWarranty,
        F::Stratus,
        W::ManufactureWarranty,
        0.75,
        "count_stratus_manuf",
    ),
    info(
        C::HomefillFlatRate,
        F::Homefill,
        W::FlatRate,
        2.0,
        "count_homefill_flat",
    ),
    info(
        C::HomefillManufactureWarranty,
        F::Homefill,
        W::ManufactureWarranty,
        2.0,
        "count_homefill_manuf",
    ),
    info(
        C::Model525QmWarranty,
        F::Model525,
        W::QmWarranty,
        0.75,
        "count_qm",
    ),
    info(C::Model525Pm, F::Model525, W::Pm, 0.25, "count_pm"),
    info(
        C::Model525MinorRepair,
        F::Model525,
        W::MinorRepair,
        0.50,
        "count_minor",
    ),
    info(
        C::Model525FlatRate,
        F::Model525,
        W::FlatRate,
        1.0,
        "count_flat",
    ),
    info(
        C::Model525ManufactureWarranty,
        F::Model525,
        W::ManufactureWarranty,
        1.0,
        "count_manuf",
    ),
    info(
        C::Model1025QmWarranty,
        F::Model1025,
        W::QmWarranty,
        0.75,
        "count_1025_qm",
    ),
    info(C::Model1025Pm, F::Model1025, W::Pm, 0.25, "count_1025_pm"),
    info(
        C::Model1025MinorRepair,
        F::Model1025,
        W::MinorRepair,
        0.50,
        "count_1025_minor",
    ),
    info(
        C::Model1025FlatRate,
        F::Model1025,
        W::FlatRate,
        1.0,
        "count_1025_flat",
    ),
    info(
        C::Model1025ManufactureWarranty,
        F::Model1025,
        W::ManufactureWarranty,
        1.0,
        "count_1025_manuf",
    ),
    info(
        C::Perfecto2VQmWarranty,
        F::Perfecto2V,
        W::QmWarranty,
        1.0,
        "count_perfecto_qm",
    ),
    info(
        C::Perfecto2VFlatRate,
        F::Perfecto2V,
        W::FlatRate,
        1.25,
        "count_perfecto_flat",
    ),
    info(
        C::Perfecto2VManufactureWarranty,
        F::Perfecto2V,
        W::ManufactureWarranty,
        1.25,
        "count_perfecto_manuf",
    ),
    info(
        C::M10QmWarranty,
        F::M10,
        W::QmWarranty,
        1.25,
        "count_m10_qm",
    ),
    info(C::M10FlatRate, F::M10, W::FlatRate, 1.75, "count_m10_flat"),
    info(
        C::M10ManufactureWarranty,
        F::M10,
        W::ManufactureWarranty,
        1.75,
        "count_m10_manuf",
    ),
    info(
        C::RhythmLm5aQmWarranty,
        F::RhythmLm5a,
        W::QmWarranty,
        0.75,
        "count_lm5a_qm",
    ),
    info(
        C::RhythmLm5aFlatRate,
        F::RhythmLm5a,
        W::FlatRate,
        1.0,
        "count_lm5a_flat",
    ),
    info(
        C::RhythmLm5aManufactureWarranty,
        F::RhythmLm5a,
        W::ManufactureWarranty,
        1.0,
        "count_lm5a_manuf",
    ),
    info(
        C::RhythmLm5baQmWarranty,
        F::RhythmLm5ba,
        W::QmWarranty,
        0.75,
        "count_lm5ba_qm",
    ),
    info(
        C::RhythmLm5baFlatRate,
        F::RhythmLm5ba,
        W::FlatRate,
        1.0,
        "count_lm5ba_flat",
    ),
    info(
        C::RhythmLm5baManufactureWarranty,
        F::RhythmLm5ba,
        W::ManufactureWarranty,
        1.0,
        "count_lm5ba_manuf",
    ),
    info(
        C::RhythmLm5caQmWarranty,
        F::RhythmLm5ca,
        W::QmWarranty,
        0.75,
        "count_lm5ca_qm",
    ),
    info(
        C::RhythmLm5caFlatRate,
        F::RhythmLm5ca,
        W::FlatRate,
        1.0,
        "count_lm5ca_flat",
    ),
    info(
        C::RhythmLm5caManufactureWarranty,
        F::RhythmLm5ca,
        W::ManufactureWarranty,
        1.0,
        "count_lm5ca_manuf",
    ),
    info(C::PocRepair, F::Poc, W::Repair, 2.0, "count_poc_repair"),
];

impl Category {
    /// Every category in schema (display and persistence) order.
    pub fn all() -> impl Iterator<Item = Category> {
        SCHEMA.iter().map(|entry| entry.category)
    }

    pub fn info(self) -> &'static CategoryInfo {
        &SCHEMA[self as usize]
    }

    pub fn family(self) -> Family {
        self.info().family
    }

    pub fn warranty(self) -> WarrantyType {
        self.info().warranty
    }

    /// Points credited per unit.
    pub fn points(self) -> f64 {
        self.info().points
    }

    /// Stable column name in the persisted record.
    pub fn field_name(self) -> &'static str {
        self.info().field
    }

    pub fn from_field_name(field: &str) -> Option<Category> {
        SCHEMA
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.category)
    }

    /// Returns the category for a family/warranty pair, if the family supports it.
    pub fn lookup(family: Family, warranty: WarrantyType) -> Option<Category> {
        SCHEMA
            .iter()
            .find(|entry| entry.family == family && entry.warranty == warranty)
            .map(|entry| entry.category)
    }

    pub fn resolve(family: Family, warranty: WarrantyType) -> Result<Category, ParseCategoryError> {
        Category::lookup(family, warranty)
            .ok_or(ParseCategoryError::Unsupported { family, warranty })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family(), self.warranty())
    }
}

/// Accepts either a persisted field name (`count_1025_qm`) or `family:warranty` (`1025:qm`).
impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(category) = Category::from_field_name(&trimmed.to_ascii_lowercase()) {
            return Ok(category);
        }
        let (family, warranty) = trimmed
            .split_once(':')
            .or_else(|| trimmed.split_once('/'))
            .ok_or_else(|| ParseCategoryError::Malformed(trimmed.to_string()))?;
        Category::resolve(family.parse()?, warranty.parse()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised while resolving user-supplied family, warranty, or category names.
pub enum ParseCategoryError {
    UnknownFamily(String),
    UnknownWarranty(String),
    Unsupported {
        family: Family,
        warranty: WarrantyType,
    },
    Malformed(String),
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCategoryError::UnknownFamily(value) => {
                write!(f, "unknown unit family `{}`", value)
            }
            ParseCategoryError::UnknownWarranty(value) => {
                write!(f, "unknown warranty type `{}`", value)
            }
            ParseCategoryError::Unsupported { family, warranty } => {
                write!(f, "{} units are not tracked under {}", family, warranty)
            }
            ParseCategoryError::Malformed(value) => write!(
                f,
                "`{}` is not a category; use `family:warranty` or a field name",
                value
            ),
        }
    }
}

impl std::error::Error for ParseCategoryError {}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn schema_order_matches_discriminants() {
        for (index, entry) in SCHEMA.iter().enumerate() {
            assert_eq!(entry.category as usize, index, "{:?}", entry.category);
        }
    }

    #[test]
    fn field_names_are_unique_and_reversible() {
        let fields: HashSet<_> = Category::all().map(Category::field_name).collect();
        assert_eq!(fields.len(), SCHEMA.len());
        for category in Category::all() {
            assert_eq!(Category::from_field_name(category.field_name()), Some(category));
        }
    }

    #[test]
    fn points_are_non_negative() {
        assert!(Category::all().all(|category| category.points() >= 0.0));
        assert_eq!(Category::Model525QmWarranty.points(), 0.75);
        assert_eq!(Category::M10FlatRate.points(), 1.75);
        assert_eq!(Category::PocRepair.points(), 2.0);
    }

    #[test]
    fn families_only_expose_supported_warranties() {
        assert_eq!(Family::Stratus.categories().count(), 2);
        assert_eq!(Family::Model1025.categories().count(), 5);
        assert_eq!(Family::Poc.categories().count(), 1);
        assert_eq!(Category::lookup(Family::Stratus, WarrantyType::Pm), None);
        assert_eq!(
            Category::resolve(Family::Poc, WarrantyType::FlatRate),
            Err(ParseCategoryError::Unsupported {
                family: Family::Poc,
                warranty: WarrantyType::FlatRate,
            })
        );
    }

    #[test]
    fn parses_family_and_warranty_aliases() {
        assert_eq!("s".parse::<Family>().unwrap(), Family::Stratus);
        assert_eq!("10".parse::<Family>().unwrap(), Family::Model1025);
        assert_eq!("Perfecto 2V".parse::<Family>().unwrap(), Family::Perfecto2V);
        assert_eq!("rhythm lm5ba".parse::<Family>().unwrap(), Family::RhythmLm5ba);
        assert_eq!("mw".parse::<WarrantyType>().unwrap(), WarrantyType::ManufactureWarranty);
        assert_eq!("Flat Rate".parse::<WarrantyType>().unwrap(), WarrantyType::FlatRate);
        assert!("9000".parse::<Family>().is_err());
    }

    #[test]
    fn parses_categories_from_fields_and_pairs() {
        assert_eq!("count_1025_qm".parse::<Category>().unwrap(), Category::Model1025QmWarranty);
        assert_eq!("525:minor".parse::<Category>().unwrap(), Category::Model525MinorRepair);
        assert_eq!("poc/repair".parse::<Category>().unwrap(), Category::PocRepair);
        assert!(matches!(
            "stratus".parse::<Category>(),
            Err(ParseCategoryError::Malformed(_))
        ));
    }

    #[test]
    fn category_serializes_as_variant_name() {
        let json = serde_json::to_string(&Category::PocRepair).unwrap();
        assert_eq!(json, "\"PocRepair\"");
    }

    #[test]
    fn display_combines_family_and_warranty() {
        assert_eq!(Category::Model525Pm.to_string(), "525 PM");
        assert_eq!(
            Category::RhythmLm5caManufactureWarranty.to_string(),
            "Rhythm LM5CA Manufacture Warranty"
        );
    }
}
