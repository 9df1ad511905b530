//! Hypothesis tests: one-sample t, Welch two-sample t, one-way ANOVA, chi-squared independence

use crate::distributions::{chi_sf, f_sf, t_two_tailed_p};
use crate::helpers::{mean, require_non_empty, variance_impl};
use biostat_core::StatsError;
use biostat_plugin::{HypothesisTests, TestMethod, TestOutcome, TestSettings};
use indexmap::IndexMap;

/// Built-in implementation of the test primitives.
///
/// Structurally invalid input is an error. Input that is merely too small
/// for a statistic to exist (a single observation, zero variance) gives NaN
/// or infinite fields instead, so callers can still report the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTests;

impl StandardTests {
    pub fn new() -> Self {
        Self
    }
}

impl HypothesisTests for StandardTests {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn one_sample_t(&self, values: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        require_non_empty(values, "t_test_1")?;

        let n = values.len() as f64;
        let df = n - 1.0;
        let se = (variance_impl(values, true) / n).sqrt();
        let t = mean(values) / se;

        Ok(TestOutcome::new(
            TestMethod::OneSampleT,
            t,
            t_two_tailed_p(t, df),
            df,
            settings.alpha,
        ))
    }

    fn two_sample_t(&self, a: &[f64], b: &[f64], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        require_non_empty(a, "t_test_2")?;
        require_non_empty(b, "t_test_2")?;

        let n1 = a.len() as f64;
        let n2 = b.len() as f64;
        let v1 = variance_impl(a, true) / n1;
        let v2 = variance_impl(b, true) / n2;

        let se = (v1 + v2).sqrt();
        let t = (mean(a) - mean(b)) / se;

        // Welch-Satterthwaite
        let df = (v1 + v2).powi(2) / (v1.powi(2) / (n1 - 1.0) + v2.powi(2) / (n2 - 1.0));

        Ok(TestOutcome::new(
            TestMethod::TwoSampleT,
            t,
            t_two_tailed_p(t, df),
            df,
            settings.alpha,
        ))
    }

    fn one_way_anova(
        &self,
        values: &[f64],
        labels: &[String],
        settings: TestSettings,
    ) -> Result<TestOutcome, StatsError> {
        if values.len() != labels.len() {
            return Err(StatsError::LengthMismatch {
                test: "anova",
                left: values.len(),
                right: labels.len(),
            });
        }

        let mut groups: IndexMap<&str, Vec<f64>> = IndexMap::new();
        for (value, label) in values.iter().zip(labels) {
            groups.entry(label.as_str()).or_default().push(*value);
        }

        if groups.len() < 2 {
            return Err(StatsError::InsufficientData {
                test: "anova",
                what: "groups",
                needed: 2,
                got: groups.len(),
            });
        }

        let grand_mean = mean(values);
        let (ss_between, ss_within) = groups.values().fold((0.0, 0.0), |(between, within), group| {
            let m = mean(group);
            let dev: f64 = group.iter().map(|x| (x - m).powi(2)).sum();
            (between + group.len() as f64 * (m - grand_mean).powi(2), within + dev)
        });

        let k = groups.len() as f64;
        let df_between = k - 1.0;
        let df_within = values.len() as f64 - k;

        let f = (ss_between / df_between) / (ss_within / df_within);

        Ok(TestOutcome::new(
            TestMethod::OneWayAnova,
            f,
            f_sf(f, df_between, df_within),
            df_between,
            settings.alpha,
        )
        .with_denominator_df(df_within))
    }

    fn chi_squared(&self, table: &[Vec<u64>], settings: TestSettings) -> Result<TestOutcome, StatsError> {
        let rows = table.len();
        let cols = table.first().map_or(0, Vec::len);
        if rows < 2 || cols < 2 {
            return Err(StatsError::InvalidTable(format!(
                "need at least 2 rows and 2 columns, got {}x{}",
                rows, cols
            )));
        }
        if let Some(bad) = table.iter().position(|row| row.len() != cols) {
            return Err(StatsError::InvalidTable(format!(
                "row {} has {} columns, expected {}",
                bad,
                table[bad].len(),
                cols
            )));
        }

        let row_totals: Vec<f64> = table.iter().map(|row| row.iter().sum::<u64>() as f64).collect();
        let col_totals: Vec<f64> = (0..cols)
            .map(|c| table.iter().map(|row| row[c]).sum::<u64>() as f64)
            .collect();
        if row_totals.iter().chain(&col_totals).any(|&t| t == 0.0) {
            return Err(StatsError::Domain(
                "chi_test() requires every row and column to have a non-zero total".to_string(),
            ));
        }

        let total: f64 = row_totals.iter().sum();
        let correction = if settings.yates_correction && rows == 2 && cols == 2 {
            0.5
        } else {
            0.0
        };

        let mut statistic = 0.0;
        for (r, row) in table.iter().enumerate() {
            for (c, &observed) in row.iter().enumerate() {
                let expected = row_totals[r] * col_totals[c] / total;
                let diff = ((observed as f64 - expected).abs() - correction).max(0.0);
                statistic += diff * diff / expected;
            }
        }

        let df = ((rows - 1) * (cols - 1)) as f64;

        Ok(TestOutcome::new(
            TestMethod::ChiSquared,
            statistic,
            chi_sf(statistic, df),
            df,
            settings.alpha,
        ))
    }
}
