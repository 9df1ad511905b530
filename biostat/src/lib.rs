//! Biostat - statistical analysis of patient spreadsheets
//!
//! Groups sheet rows by a primary characteristic, summarizes every secondary
//! characteristic per group and picks the hypothesis test that fits: t-tests
//! or ANOVA for quantitative variables, chi-squared for qualitative ones.

mod grouping;
mod contingency;
mod result;
mod analyzer;
mod global;
mod overview;

pub use grouping::{partition, Group};
pub use contingency::{ContingencyBuilder, ContingencyMatrix, NOT_PROVIDED, NOT_SPECIFIED};
pub use result::{AnalysisResult, AxisLabels, GroupData, SubAnalysisResult};
pub use analyzer::analyze_sheet;
pub use global::{analyze_across_sheets, GLOBAL};
pub use overview::{overview, Overview, OverviewData};

pub use biostat_core::{BiostatError, CellValue, Characteristic, CharacteristicKind, Record, Workbook};
pub use biostat_plugin::{AnalysisContext, AnalysisOptions, HypothesisTests, NanPolicy, TestOutcome};
pub use biostat_stats::DescriptiveStats;

use biostat_plugin::CharacteristicRegistry;
use indexmap::IndexMap;
use tracing::{info, warn};

/// Results of a run keyed by sheet name, "Global" last
pub type AnalysisRun = IndexMap<String, Result<AnalysisResult, BiostatError>>;

/// Main Biostat engine
#[derive(Debug, Clone)]
pub struct Biostat {
    ctx: AnalysisContext,
}

impl Biostat {
    pub fn new(ctx: AnalysisContext) -> Self {
        Self { ctx }
    }

    pub fn with_standard_library() -> Self {
        Self::new(biostat_stats::standard_context())
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.ctx = self.ctx.with_options(options);
        self
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    pub fn registry(&self) -> &CharacteristicRegistry {
        &self.ctx.registry
    }

    pub fn analyze_sheet<S: AsRef<str>>(
        &self,
        sheet: &str,
        records: &[Record],
        primary: &str,
        secondaries: &[S],
    ) -> Result<AnalysisResult, BiostatError> {
        analyzer::analyze_sheet(&self.ctx, sheet, records, primary, secondaries)
    }

    pub fn analyze_across_sheets<S: AsRef<str>, T: AsRef<str>>(
        &self,
        sheet_names: &[S],
        workbook: &Workbook,
        primary: &str,
        secondaries: &[T],
    ) -> Result<AnalysisResult, BiostatError> {
        global::analyze_across_sheets(&self.ctx, sheet_names, workbook, primary, secondaries)
    }

    pub fn overview<S: AsRef<str>>(
        &self,
        sheet_names: &[S],
        workbook: &Workbook,
        characteristic: &str,
    ) -> Result<Overview, BiostatError> {
        overview::overview(&self.ctx, sheet_names, workbook, characteristic)
    }

    /// Analyze every named sheet, then all of them together.
    ///
    /// A failing analysis is logged and recorded as an `Err` entry; the
    /// others still run. Sheets absent from the workbook are analyzed as
    /// empty. A sheet named "Global" is replaced by the global entry.
    pub fn run<S: AsRef<str>, T: AsRef<str>>(
        &self,
        workbook: &Workbook,
        sheet_names: &[S],
        primary: &str,
        secondaries: &[T],
    ) -> AnalysisRun {
        info!(
            sheets = sheet_names.len(),
            primary = %primary,
            secondaries = secondaries.len(),
            "Starting analysis run"
        );

        let mut run = AnalysisRun::with_capacity(sheet_names.len() + 1);
        for name in sheet_names {
            let name = name.as_ref();
            let records = workbook.sheet(name).unwrap_or_default();
            let result = self.analyze_sheet(name, records, primary, secondaries);
            if let Err(e) = &result {
                warn!(sheet = %name, error = %e, "Sheet analysis failed");
            }
            run.insert(name.to_string(), result);
        }

        let global = self.analyze_across_sheets(sheet_names, workbook, primary, secondaries);
        if let Err(e) = &global {
            warn!(error = %e, "Global analysis failed");
        }
        if run.shift_remove(GLOBAL).is_some() {
            warn!("Sheet named {:?} is shadowed by the global analysis", GLOBAL);
        }
        run.insert(GLOBAL.to_string(), global);

        let failed = run.values().filter(|r| r.is_err()).count();
        info!(entries = run.len(), failed, "Analysis run finished");
        run
    }
}

impl Default for Biostat {
    fn default() -> Self {
        Self::with_standard_library()
    }
}
