//! Grouping engine
//!
//! Splits the rows of a sheet into ordered groups by a primary
//! characteristic: one group per age band, one per domain value for closed
//! characteristics, none at all for open ones.

use biostat_core::{age_band_index, Characteristic, Record, AGE_BAND_LABELS, AGE_FIELD};

/// Records sharing one partition predicate, borrowed from the caller's sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub label: String,
    pub records: Vec<&'a Record>,
}

impl<'a> Group<'a> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
        }
    }

    /// A group holding every record of a sheet
    pub fn from_sheet(label: impl Into<String>, records: &'a [Record]) -> Self {
        Self {
            label: label.into(),
            records: records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Numeric coercion of `column` for every record, in record order
    pub fn numbers(&self, column: &str) -> Vec<f64> {
        self.records.iter().map(|r| r.number(column)).collect()
    }
}

/// Partition `records` by `primary`.
///
/// - Age bands: exactly eight groups in band order. Rows whose age does not
///   coerce to a number fall in no band.
/// - Closed domain: one group per domain value, in domain order, matched by
///   strict cell equality. Rows outside the domain fall in no group.
/// - Open characteristic: no partition, zero groups.
pub fn partition<'a>(primary: &Characteristic, records: &'a [Record]) -> Vec<Group<'a>> {
    if primary.is_age_category() {
        let mut groups: Vec<Group<'a>> = AGE_BAND_LABELS.iter().map(|l| Group::new(*l)).collect();
        for record in records {
            if let Some(band) = age_band_index(record.number(AGE_FIELD)) {
                groups[band].records.push(record);
            }
        }
        return groups;
    }

    let Some(domain) = primary.value_domain.as_deref() else {
        return Vec::new();
    };

    domain
        .iter()
        .zip(primary.domain_labels())
        .map(|(value, label)| Group {
            label,
            records: records
                .iter()
                .filter(|r| r.get(&primary.name) == value)
                .collect(),
        })
        .collect()
}

/// Group labels in group order
pub(crate) fn labels_of(groups: &[Group<'_>]) -> Vec<String> {
    groups.iter().map(|g| g.label.clone()).collect()
}
