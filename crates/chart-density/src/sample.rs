//! Sample extraction
//!
//! Turns records into numeric samples. Missing values are part of normal
//! chart data, so they are dropped silently: an absent field, an explicit
//! null, or a non-numeric value never reaches the estimator and never
//! raises an error. Relative record order is preserved.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::records::{Record, RecordSet};

/// Numeric value of `field` in a record, if present and numeric
pub fn numeric_value(record: &Record, field: &str) -> Option<f64> {
    record
        .get(field)
        .and_then(Value::as_f64)
        .filter(|x| x.is_finite())
}

/// Numeric values of `field`, skipping records where it is missing
pub fn extract_sample(records: &RecordSet, field: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| numeric_value(r, field))
        .collect()
}

/// One sample per field, keeping only records complete in every field
///
/// A record with any of `fields` missing contributes to none of the
/// samples, so all returned samples have the same length and stay aligned
/// record by record.
pub fn extract_complete_samples<S: AsRef<str>>(records: &RecordSet, fields: &[S]) -> Vec<Vec<f64>> {
    let mut samples = vec![Vec::new(); fields.len()];

    for record in records {
        let row: Option<Vec<f64>> = fields
            .iter()
            .map(|f| numeric_value(record, f.as_ref()))
            .collect();

        if let Some(row) = row {
            for (sample, value) in samples.iter_mut().zip(row) {
                sample.push(value);
            }
        }
    }

    samples
}

/// Samples of `value_field` keyed by the value of `group_field`
///
/// Records with a missing group key or value are skipped. String keys are
/// used as is and booleans use their display form. Numeric keys go through
/// `f64`, so `2` and `2.0` land in the same group `"2"`.
pub fn group_samples(
    records: &RecordSet,
    group_field: &str,
    value_field: &str,
) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for record in records {
        let key = record.get(group_field).and_then(group_key);
        let value = numeric_value(record, value_field);
        if let (Some(key), Some(value)) = (key, value) {
            groups.entry(key).or_default().push(value);
        }
    }

    groups
}

/// Drop NaN and infinite values from a raw column
pub fn filter_finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|x| x.is_finite()).collect()
}

fn group_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(|x| x.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
