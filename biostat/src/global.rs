//! Global analyzer: every sheet is one group

use crate::analyzer::{qualitative, quantitative};
use crate::contingency::{ContingencyBuilder, ContingencyMatrix, NOT_PROVIDED};
use crate::grouping::{labels_of, Group};
use crate::result::{AnalysisResult, GroupData, SubAnalysisResult};
use biostat_core::{age_band_label, BiostatError, Characteristic, CharacteristicKind, Workbook};
use biostat_plugin::AnalysisContext;
use tracing::{debug, instrument};

/// Name of the cross-sheet analysis
pub const GLOBAL: &str = "Global";

/// One group per sheet name, in the given order. Names missing from the
/// workbook give empty groups.
pub(crate) fn sheet_groups<'a, S: AsRef<str>>(sheet_names: &[S], workbook: &'a Workbook) -> Vec<Group<'a>> {
    sheet_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let records = match workbook.sheet(name) {
                Some(records) => records,
                None => {
                    debug!(sheet = %name, "Sheet not in workbook, treated as empty");
                    &[]
                }
            };
            Group::from_sheet(name, records)
        })
        .collect()
}

/// Grouped-mode table of `characteristic` across `groups`. The age bands are
/// classified per record from its age column.
pub(crate) fn grouped_contingency(
    characteristic: &Characteristic,
    groups: &[Group<'_>],
    labels: &[String],
) -> Result<ContingencyMatrix, BiostatError> {
    let builder = ContingencyBuilder::new().with_missing_label(NOT_PROVIDED);
    if characteristic.is_age_category() {
        builder.build_grouped_with(groups, labels, |record| {
            age_band_label(record).map(str::to_string)
        })
    } else {
        builder.build_from_groups(groups, labels, &characteristic.name)
    }
}

/// Compare sheets to each other. The primary characteristic is analyzed
/// first, followed by the secondaries; unknown names are skipped.
#[instrument(skip_all, fields(sheets = sheet_names.len(), primary = %primary))]
pub fn analyze_across_sheets<S: AsRef<str>, T: AsRef<str>>(
    ctx: &AnalysisContext,
    sheet_names: &[S],
    workbook: &Workbook,
    primary: &str,
    secondaries: &[T],
) -> Result<AnalysisResult, BiostatError> {
    let groups = sheet_groups(sheet_names, workbook);
    let labels = labels_of(&groups);

    let names = std::iter::once(primary).chain(secondaries.iter().map(|s| s.as_ref()));
    let mut sub_analyses = Vec::with_capacity(secondaries.len() + 1);

    for name in names {
        let Some(characteristic) = ctx.registry.lookup(name) else {
            debug!(characteristic = %name, "Skipping unknown characteristic");
            continue;
        };

        let sub = match characteristic.kind {
            CharacteristicKind::Quantitative => quantitative(ctx, characteristic, &groups, &labels),
            CharacteristicKind::Qualitative => grouped_contingency(characteristic, &groups, &labels)
                .and_then(|table| qualitative(ctx, characteristic, table, labels.clone(), !groups.is_empty())),
            CharacteristicKind::Date => Ok(SubAnalysisResult::empty(characteristic.clone())),
        }
        .map_err(|e| e.in_sheet(GLOBAL).for_characteristic(name))?;

        sub_analyses.push(sub);
    }

    Ok(AnalysisResult {
        name: GLOBAL.to_string(),
        primary: primary.to_string(),
        groups: groups.iter().map(GroupData::from).collect(),
        sub_analyses,
    })
}
