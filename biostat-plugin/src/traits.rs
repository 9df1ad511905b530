//! Hypothesis-test primitives
//!
//! The analyzers decide which test to run and shape its input; the numbers
//! themselves come from an implementation of `HypothesisTests`. The built-in
//! one lives in `biostat-stats`, tests plug in recording stubs.

use biostat_core::StatsError;
use serde::{Deserialize, Serialize};

/// Which test produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    OneSampleT,
    TwoSampleT,
    OneWayAnova,
    ChiSquared,
}

impl TestMethod {
    /// Display name shown next to the result
    pub fn display_name(&self) -> &'static str {
        match self {
            TestMethod::OneSampleT => "One-sample t-test",
            TestMethod::TwoSampleT => "Welch two-sample t-test",
            TestMethod::OneWayAnova => "One-way ANOVA",
            TestMethod::ChiSquared => "Chi-square independence test",
        }
    }
}

impl std::fmt::Display for TestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Settings every primitive receives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestSettings {
    /// Significance level for the `rejected` decision
    pub alpha: f64,
    /// Continuity correction on 2x2 chi-squared tables
    pub yates_correction: bool,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            yates_correction: true,
        }
    }
}

/// Outcome of a hypothesis test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub method: TestMethod,
    pub statistic: f64,
    pub p_value: f64,
    /// Degrees of freedom (numerator df for ANOVA; fractional for Welch)
    pub degrees_of_freedom: f64,
    /// Denominator df, ANOVA only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub denominator_df: Option<f64>,
    pub alpha: f64,
    /// Null hypothesis rejected at `alpha`. False when the p-value is NaN.
    pub rejected: bool,
}

impl TestOutcome {
    pub fn new(method: TestMethod, statistic: f64, p_value: f64, degrees_of_freedom: f64, alpha: f64) -> Self {
        Self {
            method,
            statistic,
            p_value,
            degrees_of_freedom,
            denominator_df: None,
            alpha,
            rejected: p_value < alpha,
        }
    }

    /// Builder: set the denominator degrees of freedom
    pub fn with_denominator_df(mut self, df: f64) -> Self {
        self.denominator_df = Some(df);
        self
    }
}

/// The four numerical primitives the analyzers dispatch to
pub trait HypothesisTests: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// One-sample t-test of the mean against zero
    fn one_sample_t(&self, values: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError>;

    /// Two-sample t-test between `a` and `b`
    fn two_sample_t(&self, a: &[f64], b: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError>;

    /// One-way ANOVA on long-format input: `values[i]` belongs to group `labels[i]`
    fn one_way_anova(
        &self,
        values: &[f64],
        labels: &[String],
        settings: TestSettings,
    ) -> Result<TestOutcome, StatsError>;

    /// Chi-squared test of independence on a counts table
    fn chi_squared(&self, table: &[Vec<u64>], settings: TestSettings) -> Result<TestOutcome, StatsError>;
}
