//! Record sets
//!
//! Records are loosely typed JSON objects, the shape chart data arrives in:
//! any field may be absent, null, a number, or a string. Record sets can be
//! read from a JSON array of objects or from a CSV file with a header row.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{DensityError, DensityResult};

/// A single record: field name to JSON value
pub type Record = Map<String, Value>;

/// CSV cell contents treated as missing (compared case-insensitively)
const MISSING_MARKERS: &[&str] = &["", "na", "null", "nan"];

/// An ordered collection of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Create a record set
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of objects
    pub fn from_json_str(json: &str) -> DensityResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DensityError::Parse(e.to_string()))?;
        Self::from_json_value(value)
    }

    /// Build from an already parsed JSON document
    pub fn from_json_value(value: Value) -> DensityResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(DensityError::Parse(format!(
                    "expected an array of records, got {}",
                    json_kind(&other)
                )))
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(DensityError::Parse(format!(
                    "record {} is {}, expected an object",
                    i,
                    json_kind(&other)
                ))),
            })
            .collect::<DensityResult<Vec<_>>>()?;

        Ok(Self { records })
    }

    /// Read CSV with a header row
    ///
    /// Empty cells and `NA`/`null`/`NaN` become null, cells that parse as a
    /// finite number become numbers, anything else stays a string.
    pub fn from_csv_reader<R: Read>(reader: R) -> DensityResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DensityError::Parse(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut records = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let row = result.map_err(|e| DensityError::CsvRow {
                line: line + 2,
                message: e.to_string(),
            })?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.clone(), parse_cell(cell)))
                .collect();
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Load from a `.json` or `.csv` file
    pub fn from_path(path: impl AsRef<Path>) -> DensityResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DensityError::FileNotFound(path.display().to_string()));
        }

        match extension(path).as_deref() {
            Some("json") => {
                let content = std::fs::read_to_string(path)?;
                Self::from_json_str(&content)
            }
            Some("csv") => Self::from_csv_reader(BufReader::new(File::open(path)?)),
            _ => Err(DensityError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every field name that appears in at least one record
    pub fn field_names(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|r| r.keys().cloned())
            .collect()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn parse_cell(cell: &str) -> Value {
    if MISSING_MARKERS
        .iter()
        .any(|m| cell.eq_ignore_ascii_case(m))
    {
        return Value::Null;
    }

    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
