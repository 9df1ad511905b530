//! Parsed sheet data
//!
//! A `Record` is one spreadsheet row keyed by column header; a `Workbook`
//! maps sheet names to their rows. Both keep insertion order, which later
//! becomes axis order.

use crate::{BiostatError, CellValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

static NULL_CELL: CellValue = CellValue::Null;

/// One row of a sheet. Absent columns read as `CellValue::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, CellValue>);

impl Record {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder: set a field
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(column.into(), value.into());
    }

    /// Field value, `Null` when the column is absent
    pub fn get(&self, column: &str) -> &CellValue {
        self.0.get(column).unwrap_or(&NULL_CELL)
    }

    /// Numeric coercion of a field (NaN when missing or not numeric)
    pub fn number(&self, column: &str) -> f64 {
        self.get(column).to_number()
    }

    /// Label of a field, `None` when missing
    pub fn label(&self, column: &str) -> Option<String> {
        self.get(column).to_label()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Row count and column headers of one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub name: String,
    pub row_count: usize,
    /// Column headers in first-seen order across all rows
    pub columns: Vec<String>,
}

/// Named sheets in caller order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook(IndexMap<String, Vec<Record>>);

impl Workbook {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Parse the `{"Sheet": [{"column": value, ...}, ...]}` shape produced by
    /// spreadsheet-to-rows converters.
    pub fn from_json(json: &str) -> Result<Self, BiostatError> {
        serde_json::from_str(json).map_err(|e| BiostatError::parse_error(e.to_string()))
    }

    /// Builder: add a sheet
    pub fn with_sheet(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.0.insert(name.into(), records);
        self
    }

    pub fn insert_sheet(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.0.insert(name.into(), records);
    }

    pub fn sheet(&self, name: &str) -> Option<&[Record]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn metadata(&self) -> Vec<SheetMetadata> {
        self.0
            .iter()
            .map(|(name, records)| {
                let mut columns: IndexMap<&str, ()> = IndexMap::new();
                for record in records {
                    for column in record.columns() {
                        columns.entry(column).or_insert(());
                    }
                }
                SheetMetadata {
                    name: name.clone(),
                    row_count: records.len(),
                    columns: columns.keys().map(|c| c.to_string()).collect(),
                }
            })
            .collect()
    }
}
