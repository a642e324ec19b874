//! One-row CSV encoding of the ledger record.
//!
//! Decoding is keyed by column name: unknown columns are ignored and absent or
//! malformed values fall back to zero (or no date), each noted as a warning.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracker_domain::{Category, Family, LedgerRecord, LedgerState, WarrantyType};

use crate::StorageError;

pub const OUTPUT_FIELD: &str = "output";
pub const WEIGHTED_FIELD: &str = "weighted_output";
pub const START_DATE_FIELD: &str = "start_date";
pub const START_OF_DAY_FIELD: &str = "start_of_day_output";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of decoding a record: the state plus any repairs applied on the way in.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub state: LedgerState,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

fn legacy_families() -> impl Iterator<Item = (Family, &'static str)> {
    Family::ALL
        .into_iter()
        .filter_map(|family| family.legacy_total_field().map(|field| (family, field)))
}

/// Column names in write order.
pub fn header() -> Vec<&'static str> {
    let mut fields = vec![
        OUTPUT_FIELD,
        WEIGHTED_FIELD,
        START_DATE_FIELD,
        START_OF_DAY_FIELD,
    ];
    fields.extend(legacy_families().map(|(_, field)| field));
    fields.extend(Category::all().map(Category::field_name));
    fields
}

pub fn encode(state: &LedgerState) -> Result<Vec<u8>, StorageError> {
    let mut row = vec![
        state.total_output().to_string(),
        format!("{:?}", state.weighted_output()),
        state
            .start_date()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        state.start_of_day_output().to_string(),
    ];
    row.extend(legacy_families().map(|(family, _)| state.family_total(family).to_string()));
    row.extend(Category::all().map(|category| state.count(category).to_string()));

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header())?;
    writer.write_record(&row)?;
    writer
        .into_inner()
        .map_err(|err| StorageError::Io(err.into_error()))
}

pub fn decode(data: &[u8]) -> Result<Decoded, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);
    let headers = reader.headers()?.clone();
    if !headers.iter().any(|name| name == OUTPUT_FIELD) {
        return Err(StorageError::Malformed(format!(
            "header has no `{}` column",
            OUTPUT_FIELD
        )));
    }
    let row = reader
        .records()
        .next()
        .ok_or_else(|| StorageError::Malformed("record has no data row".into()))??;
    let fields: HashMap<&str, &str> = headers.iter().zip(row.iter()).collect();

    let mut fields = FieldReader {
        fields,
        warnings: Vec::new(),
    };
    let total_output = fields.count(OUTPUT_FIELD);
    let weighted_output = fields.points(WEIGHTED_FIELD);
    let start_date = fields.date(START_DATE_FIELD);
    let start_of_day_output = fields.count(START_OF_DAY_FIELD);
    let mut counters: BTreeMap<Category, u64> = Category::all()
        .map(|category| (category, fields.count(category.field_name())))
        .collect();

    let mut migrations = Vec::new();
    for (family, field) in legacy_families() {
        let aggregate = fields.count(field);
        let assigned = checked_sum(family.categories().map(|category| counters[&category]))
            .ok_or_else(|| overflow(&family.to_string()))?;
        if aggregate > 0 && assigned == 0 {
            if let Some(flat) = Category::lookup(family, WarrantyType::FlatRate) {
                counters.insert(flat, aggregate);
                migrations.push(format!(
                    "attributed legacy {} total of {} to {}",
                    family, aggregate, flat
                ));
            }
        }
    }

    checked_sum(counters.values().copied()).ok_or_else(|| overflow("category"))?;

    let state = LedgerState::from_record(LedgerRecord {
        total_output,
        weighted_output,
        counters,
        start_date,
        start_of_day_output,
    });
    Ok(Decoded {
        state,
        warnings: fields.warnings,
        migrations,
    })
}

fn checked_sum(values: impl IntoIterator<Item = u64>) -> Option<u64> {
    values
        .into_iter()
        .try_fold(0u64, |sum, value| sum.checked_add(value))
}

fn overflow(scope: &str) -> StorageError {
    StorageError::Malformed(format!("{} counters add up past the supported range", scope))
}

struct FieldReader<'a> {
    fields: HashMap<&'a str, &'a str>,
    warnings: Vec<String>,
}

impl FieldReader<'_> {
    fn raw(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .copied()
            .filter(|value| !value.is_empty())
    }

    fn count(&mut self, name: &str) -> u64 {
        let Some(value) = self.raw(name) else {
            return 0;
        };
        match value.parse::<u64>() {
            Ok(count) => count,
            Err(_) => {
                self.warnings
                    .push(format!("`{}` has invalid value `{}`; using 0", name, value));
                0
            }
        }
    }

    fn points(&mut self, name: &str) -> f64 {
        let Some(value) = self.raw(name) else {
            return 0.0;
        };
        match value.parse::<f64>() {
            Ok(points) if points.is_finite() && points >= 0.0 => points,
            _ => {
                self.warnings
                    .push(format!("`{}` has invalid value `{}`; using 0", name, value));
                0.0
            }
        }
    }

    fn date(&mut self, name: &str) -> Option<NaiveDate> {
        let value = self.raw(name)?;
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.warnings
                    .push(format!("`{}` has invalid date `{}`; ignoring", name, value));
                None
            }
        }
    }
}
