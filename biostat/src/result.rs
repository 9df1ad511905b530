//! Analysis results
//!
//! Plain data, built once per call and never updated afterwards. Everything
//! serializes for the rendering layer; NaN statistics become `null`.

use crate::contingency::ContingencyMatrix;
use crate::grouping::Group;
use biostat_core::{Characteristic, Record};
use biostat_plugin::TestOutcome;
use biostat_stats::DescriptiveStats;
use serde::Serialize;

/// Owned copy of one group of an analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupData {
    pub label: String,
    pub records: Vec<Record>,
}

impl From<&Group<'_>> for GroupData {
    fn from(group: &Group<'_>) -> Self {
        Self {
            label: group.label.clone(),
            records: group.records.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

/// Chart axes: `x` the categories (or the variable name), `y` the groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisLabels {
    pub x: Vec<String>,
    pub y: Vec<String>,
}

/// Outcome of one characteristic within an analysis
#[derive(Debug, Clone, Serialize)]
pub struct SubAnalysisResult {
    pub characteristic: Characteristic,
    /// Numeric coercions per group, NaN included (quantitative only)
    pub raw_grouped_data: Vec<Vec<f64>>,
    /// `None` when no test applies or the input is degenerate
    pub statistical_result: Option<TestOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contingency_matrix: Option<ContingencyMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptive_stats_by_group: Option<Vec<DescriptiveStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_labels: Option<AxisLabels>,
}

impl SubAnalysisResult {
    /// A result with nothing computed yet
    pub fn empty(characteristic: Characteristic) -> Self {
        Self {
            characteristic,
            raw_grouped_data: Vec::new(),
            statistical_result: None,
            contingency_matrix: None,
            descriptive_stats_by_group: None,
            axis_labels: None,
        }
    }
}

/// Analysis of one sheet, or of all sheets against each other ("Global")
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub name: String,
    pub primary: String,
    pub groups: Vec<GroupData>,
    pub sub_analyses: Vec<SubAnalysisResult>,
}

impl AnalysisResult {
    /// Sub-analysis of the named characteristic, first match
    pub fn sub_analysis(&self, characteristic: &str) -> Option<&SubAnalysisResult> {
        self.sub_analyses
            .iter()
            .find(|s| s.characteristic.name == characteristic)
    }

    pub fn group_labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }
}
