//! Contingency table builder
//!
//! Cross-tabulates a qualitative variable against either a second
//! characteristic or an ordered list of groups. Axis labels that come from
//! the data are sorted lexicographically; missing cells are counted under a
//! sentinel label instead of being dropped, so every classified record lands
//! in exactly one cell.

use crate::grouping::Group;
use biostat_core::{BiostatError, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sentinel for missing values in characteristic cross-tabulations
pub const NOT_SPECIFIED: &str = "Non spécifié";

/// Sentinel for missing values in sheet-level cross-tabulations
pub const NOT_PROVIDED: &str = "Non renseigné";

/// Counts of records per (row label, column label)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyMatrix {
    pub matrix: Vec<Vec<u64>>,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
}

impl ContingencyMatrix {
    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn total(&self) -> u64 {
        self.matrix.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.matrix.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols())
            .map(|c| self.matrix.iter().map(|row| row[c]).sum())
            .collect()
    }

    /// Count at (`row`, `col`) by label, 0 for unknown labels
    pub fn count(&self, row: &str, col: &str) -> u64 {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.col_labels.iter().position(|l| l == col);
        match (r, c) {
            (Some(r), Some(c)) => self.matrix[r][c],
            _ => 0,
        }
    }

    /// Copy without all-zero rows and columns. Empty groups and categories
    /// only seen in other groups would otherwise give zero expected counts.
    pub fn compacted(&self) -> ContingencyMatrix {
        let keep_rows: Vec<usize> = self
            .row_totals()
            .iter()
            .enumerate()
            .filter_map(|(i, &t)| (t > 0).then_some(i))
            .collect();
        let keep_cols: Vec<usize> = self
            .col_totals()
            .iter()
            .enumerate()
            .filter_map(|(i, &t)| (t > 0).then_some(i))
            .collect();

        ContingencyMatrix {
            matrix: keep_rows
                .iter()
                .map(|&r| keep_cols.iter().map(|&c| self.matrix[r][c]).collect())
                .collect(),
            row_labels: keep_rows.iter().map(|&r| self.row_labels[r].clone()).collect(),
            col_labels: keep_cols.iter().map(|&c| self.col_labels[c].clone()).collect(),
        }
    }

    /// Whether a chi-squared test can run on the compacted table
    pub fn is_testable(&self) -> bool {
        let compact = self.compacted();
        compact.rows() >= 2 && compact.cols() >= 2
    }
}

/// Builds `ContingencyMatrix` values with a configurable missing-value label
#[derive(Debug, Clone)]
pub struct ContingencyBuilder {
    missing_label: String,
}

impl ContingencyBuilder {
    pub fn new() -> Self {
        Self {
            missing_label: NOT_SPECIFIED.to_string(),
        }
    }

    pub fn with_missing_label(mut self, label: impl Into<String>) -> Self {
        self.missing_label = label.into();
        self
    }

    pub fn missing_label(&self) -> &str {
        &self.missing_label
    }

    fn label_of(&self, record: &Record, column: &str) -> String {
        record
            .label(column)
            .unwrap_or_else(|| self.missing_label.clone())
    }

    /// Primary × secondary mode. Both axes are the sorted distinct labels of
    /// their column across `records`.
    pub fn build_from_characteristics(
        &self,
        primary: &str,
        secondary: &str,
        records: &[Record],
    ) -> ContingencyMatrix {
        let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        let mut cols = BTreeSet::new();

        for record in records {
            let row = self.label_of(record, primary);
            let col = self.label_of(record, secondary);
            rows.insert(row.clone());
            cols.insert(col.clone());
            *counts.entry((row, col)).or_default() += 1;
        }

        let row_labels: Vec<String> = rows.into_iter().collect();
        let col_labels: Vec<String> = cols.into_iter().collect();
        let matrix = row_labels
            .iter()
            .map(|r| {
                col_labels
                    .iter()
                    .map(|c| counts.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        ContingencyMatrix {
            matrix,
            row_labels,
            col_labels,
        }
    }

    /// Grouped mode. One row per group labelled by `labels` in the given
    /// order; columns are the sorted distinct labels of `variable` across all
    /// groups.
    pub fn build_from_groups(
        &self,
        groups: &[Group<'_>],
        labels: &[String],
        variable: &str,
    ) -> Result<ContingencyMatrix, BiostatError> {
        self.build_grouped_with(groups, labels, |record| record.label(variable))
    }

    /// Grouped mode with a custom classifier. `None` from the classifier
    /// counts under the missing label.
    pub fn build_grouped_with<F>(
        &self,
        groups: &[Group<'_>],
        labels: &[String],
        classify: F,
    ) -> Result<ContingencyMatrix, BiostatError>
    where
        F: Fn(&Record) -> Option<String>,
    {
        if groups.len() != labels.len() {
            return Err(BiostatError::internal(format!(
                "{} groups but {} row labels",
                groups.len(),
                labels.len()
            )));
        }

        let classified: Vec<Vec<String>> = groups
            .iter()
            .map(|group| {
                group
                    .records
                    .iter()
                    .map(|r| classify(*r).unwrap_or_else(|| self.missing_label.clone()))
                    .collect()
            })
            .collect();

        let col_labels: Vec<String> = classified
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let matrix = classified
            .iter()
            .map(|values| {
                let mut row = vec![0u64; col_labels.len()];
                for value in values {
                    // Every value was collected into col_labels above
                    if let Ok(c) = col_labels.binary_search(value) {
                        row[c] += 1;
                    }
                }
                row
            })
            .collect();

        Ok(ContingencyMatrix {
            matrix,
            row_labels: labels.to_vec(),
            col_labels,
        })
    }
}

impl Default for ContingencyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
