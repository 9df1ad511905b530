//! Raw overview of one characteristic across sheets
//!
//! No hypothesis test here: each sheet plus an aggregate group holding every
//! sheet's rows, summarized the way the characteristic's kind allows.

use crate::contingency::{ContingencyMatrix, NOT_PROVIDED};
use crate::global::{grouped_contingency, sheet_groups};
use crate::grouping::{labels_of, Group};
use biostat_core::{BiostatError, Characteristic, CharacteristicKind, Workbook};
use biostat_plugin::AnalysisContext;
use biostat_stats::DescriptiveStats;
use serde::Serialize;

/// Per-kind content of an overview
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OverviewData {
    Qualitative {
        contingency_matrix: ContingencyMatrix,
    },
    Quantitative {
        raw_grouped_data: Vec<Vec<f64>>,
        descriptive_stats_by_group: Vec<DescriptiveStats>,
    },
    Date {
        raw_labels: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub characteristic: Characteristic,
    /// Sheet names followed by the aggregate label
    pub group_labels: Vec<String>,
    pub data: OverviewData,
}

/// Unknown-name error, pointing at the closest registered name if any
fn unknown_characteristic(ctx: &AnalysisContext, name: &str) -> BiostatError {
    let err = BiostatError::unknown_characteristic(name);
    match ctx.registry.suggest(name).first() {
        Some(best) => err.with_suggestion(format!("Did you mean '{}'?", best)),
        None => err,
    }
}

/// Summarize `characteristic` per sheet and for all sheets together
pub fn overview<S: AsRef<str>>(
    ctx: &AnalysisContext,
    sheet_names: &[S],
    workbook: &Workbook,
    characteristic: &str,
) -> Result<Overview, BiostatError> {
    let characteristic = ctx
        .registry
        .lookup(characteristic)
        .ok_or_else(|| unknown_characteristic(ctx, characteristic))?;

    let mut groups = sheet_groups(sheet_names, workbook);
    let total = Group {
        label: ctx.options.total_label.clone(),
        records: groups.iter().flat_map(|g| g.records.iter().copied()).collect(),
    };
    groups.push(total);
    let labels = labels_of(&groups);

    let data = match characteristic.kind {
        CharacteristicKind::Qualitative => OverviewData::Qualitative {
            contingency_matrix: grouped_contingency(characteristic, &groups, &labels)
                .map_err(|e| e.for_characteristic(&characteristic.name))?,
        },
        CharacteristicKind::Quantitative => {
            let raw: Vec<Vec<f64>> = groups.iter().map(|g| g.numbers(&characteristic.name)).collect();
            let stats = raw
                .iter()
                .map(|v| DescriptiveStats::compute(&ctx.options.nan_policy.apply(v)))
                .collect();
            OverviewData::Quantitative {
                raw_grouped_data: raw,
                descriptive_stats_by_group: stats,
            }
        }
        CharacteristicKind::Date => OverviewData::Date {
            raw_labels: groups
                .iter()
                .map(|g| {
                    g.records
                        .iter()
                        .map(|r| r.label(&characteristic.name).unwrap_or_else(|| NOT_PROVIDED.to_string()))
                        .collect()
                })
                .collect(),
        },
    };

    Ok(Overview {
        characteristic: characteristic.clone(),
        group_labels: labels,
        data,
    })
}
