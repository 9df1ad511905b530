//! Per-sheet analyzer
//!
//! Partitions one sheet by the primary characteristic, then runs the
//! branch matching each secondary characteristic's kind. The quantitative
//! and chi-squared steps are shared with the global analyzer.

use crate::contingency::{ContingencyBuilder, ContingencyMatrix};
use crate::grouping::{labels_of, partition, Group};
use crate::result::{AnalysisResult, AxisLabels, GroupData, SubAnalysisResult};
use biostat_core::{BiostatError, Characteristic, CharacteristicKind, Record};
use biostat_plugin::{AnalysisContext, TestOutcome};
use biostat_stats::DescriptiveStats;
use tracing::{debug, instrument};

/// Analyze one sheet.
///
/// Unknown secondary names are skipped. An unknown primary, like an open one,
/// leaves no partition: zero groups and no test results. Failures of the test
/// primitives propagate with the sheet and characteristic attached.
#[instrument(skip_all, fields(sheet = %sheet, primary = %primary, rows = records.len()))]
pub fn analyze_sheet<S: AsRef<str>>(
    ctx: &AnalysisContext,
    sheet: &str,
    records: &[Record],
    primary: &str,
    secondaries: &[S],
) -> Result<AnalysisResult, BiostatError> {
    let primary_characteristic = ctx.registry.lookup(primary);
    let groups = match primary_characteristic {
        Some(characteristic) => {
            let groups = partition(characteristic, records);
            if groups.is_empty() {
                debug!(
                    characteristic = %primary,
                    "Primary has no closed domain, no partition available"
                );
            }
            groups
        }
        None => {
            debug!(characteristic = %primary, "Unknown primary, no partition available");
            Vec::new()
        }
    };
    let labels = labels_of(&groups);

    let mut sub_analyses = Vec::with_capacity(secondaries.len());
    for name in secondaries {
        let name = name.as_ref();
        let Some(secondary) = ctx.registry.lookup(name) else {
            debug!(characteristic = %name, "Skipping unknown characteristic");
            continue;
        };

        let sub = match secondary.kind {
            CharacteristicKind::Quantitative => quantitative(ctx, secondary, &groups, &labels),
            CharacteristicKind::Qualitative => {
                contingency_for_sheet(primary, primary_characteristic, secondary, records, &groups, &labels)
                    .and_then(|(table, rows)| qualitative(ctx, secondary, table, rows, !groups.is_empty()))
            }
            CharacteristicKind::Date => Ok(SubAnalysisResult::empty(secondary.clone())),
        }
        .map_err(|e| e.in_sheet(sheet).for_characteristic(name))?;

        sub_analyses.push(sub);
    }

    Ok(AnalysisResult {
        name: sheet.to_string(),
        primary: primary.to_string(),
        groups: groups.iter().map(GroupData::from).collect(),
        sub_analyses,
    })
}

/// Contingency table of `secondary` within a sheet, with the row labels to
/// report. Age bands are cross-tabulated per band group and keep the band
/// order; anything else is cross-tabulated against the primary column.
fn contingency_for_sheet(
    primary: &str,
    primary_characteristic: Option<&Characteristic>,
    secondary: &Characteristic,
    records: &[Record],
    groups: &[Group<'_>],
    labels: &[String],
) -> Result<(ContingencyMatrix, Vec<String>), BiostatError> {
    let builder = ContingencyBuilder::new();
    if let Some(bands) = primary_characteristic.filter(|c| c.is_age_category()) {
        let table = builder.build_from_groups(groups, labels, &secondary.name)?;
        Ok((table, bands.domain_labels()))
    } else {
        let table = builder.build_from_characteristics(primary, &secondary.name, records);
        let rows = table.row_labels.clone();
        Ok((table, rows))
    }
}

/// Quantitative branch: raw values, per-group summaries and the test picked
/// by group count.
pub(crate) fn quantitative(
    ctx: &AnalysisContext,
    characteristic: &Characteristic,
    groups: &[Group<'_>],
    labels: &[String],
) -> Result<SubAnalysisResult, BiostatError> {
    let raw: Vec<Vec<f64>> = groups.iter().map(|g| g.numbers(&characteristic.name)).collect();
    let samples: Vec<Vec<f64>> = raw.iter().map(|v| ctx.options.nan_policy.apply(v)).collect();
    let stats = samples.iter().map(|v| DescriptiveStats::compute(v)).collect();

    let statistical_result = select_test(ctx, &characteristic.name, &samples, labels)?;

    Ok(SubAnalysisResult {
        characteristic: characteristic.clone(),
        raw_grouped_data: raw,
        statistical_result,
        contingency_matrix: None,
        descriptive_stats_by_group: Some(stats),
        axis_labels: Some(AxisLabels {
            x: vec![characteristic.name.clone()],
            y: labels.to_vec(),
        }),
    })
}

/// One group: one-sample t-test. Two: two-sample t-test. More: one-way
/// ANOVA in long format, each value tagged with its group label.
fn select_test(
    ctx: &AnalysisContext,
    name: &str,
    samples: &[Vec<f64>],
    labels: &[String],
) -> Result<Option<TestOutcome>, BiostatError> {
    let settings = ctx.settings();
    let outcome = match samples {
        [] => {
            debug!(characteristic = %name, "No groups, skipping test");
            None
        }
        [only] if only.is_empty() => {
            debug!(characteristic = %name, "Single group has no usable values, skipping t-test");
            None
        }
        [only] => Some(ctx.tests.one_sample_t(only, settings)?),
        [a, b] if a.is_empty() || b.is_empty() => {
            debug!(
                characteristic = %name,
                left = a.len(),
                right = b.len(),
                "Empty group, skipping two-sample t-test"
            );
            None
        }
        [a, b] => Some(ctx.tests.two_sample_t(a, b, settings)?),
        _ => {
            let non_empty = samples.iter().filter(|s| !s.is_empty()).count();
            if non_empty < 2 {
                debug!(
                    characteristic = %name,
                    groups = samples.len(),
                    non_empty,
                    "Fewer than two non-empty groups, skipping ANOVA"
                );
                None
            } else {
                let (values, group_labels): (Vec<f64>, Vec<String>) = samples
                    .iter()
                    .zip(labels)
                    .flat_map(|(sample, label)| sample.iter().map(move |v| (*v, label.clone())))
                    .unzip();
                Some(ctx.tests.one_way_anova(&values, &group_labels, settings)?)
            }
        }
    };
    Ok(outcome)
}

/// Qualitative branch: report the full table, test its compacted form
pub(crate) fn qualitative(
    ctx: &AnalysisContext,
    characteristic: &Characteristic,
    table: ContingencyMatrix,
    row_labels: Vec<String>,
    partitioned: bool,
) -> Result<SubAnalysisResult, BiostatError> {
    let statistical_result = if partitioned {
        chi_squared(ctx, &characteristic.name, &table)?
    } else {
        debug!(characteristic = %characteristic.name, "No partition, skipping chi-squared test");
        None
    };

    Ok(SubAnalysisResult {
        characteristic: characteristic.clone(),
        raw_grouped_data: Vec::new(),
        statistical_result,
        axis_labels: Some(AxisLabels {
            x: table.col_labels.clone(),
            y: row_labels,
        }),
        contingency_matrix: Some(table),
        descriptive_stats_by_group: None,
    })
}

fn chi_squared(
    ctx: &AnalysisContext,
    name: &str,
    table: &ContingencyMatrix,
) -> Result<Option<TestOutcome>, BiostatError> {
    if !table.is_testable() {
        debug!(
            characteristic = %name,
            rows = table.rows(),
            cols = table.cols(),
            "Degenerate contingency table, skipping chi-squared test"
        );
        return Ok(None);
    }
    let compact = table.compacted();
    Ok(Some(ctx.tests.chi_squared(&compact.matrix, ctx.settings())?))
}
