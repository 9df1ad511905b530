//! Descriptive Statistics Calculator

use crate::helpers::{mean, percentile_sorted, sorted, variance_impl};
use serde::{Deserialize, Serialize};

/// Five-number-style summary of one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub mean: f64,
    /// Sample standard deviation, 0 when fewer than two values
    pub std: f64,
}

impl DescriptiveStats {
    /// Summarize `values`. Never panics: an empty slice gives NaN location
    /// fields and `std == 0`.
    pub fn compute(values: &[f64]) -> Self {
        let sorted_values = sorted(values);
        let std = if values.len() < 2 {
            0.0
        } else {
            variance_impl(values, true).sqrt()
        };

        Self {
            median: percentile_sorted(&sorted_values, 50.0),
            q1: percentile_sorted(&sorted_values, 25.0),
            q3: percentile_sorted(&sorted_values, 75.0),
            mean: mean(values),
            std,
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compute() {
        let stats = DescriptiveStats::compute(&[45.0, 50.0, 30.0, 40.0]);
        assert_eq!(stats.median, 42.5);
        assert_eq!(stats.q1, 37.5);
        assert_eq!(stats.q3, 46.25);
        assert_eq!(stats.mean, 41.25);
        assert!((stats.std - (218.75f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.iqr(), 8.75);
    }

    #[test]
    fn test_empty_group() {
        let stats = DescriptiveStats::compute(&[]);
        assert!(stats.median.is_nan());
        assert!(stats.q1.is_nan());
        assert!(stats.q3.is_nan());
        assert!(stats.mean.is_nan());
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_singleton() {
        let stats = DescriptiveStats::compute(&[30.0]);
        assert_eq!(stats.median, 30.0);
        assert_eq!(stats.q1, 30.0);
        assert_eq!(stats.q3, 30.0);
        assert_eq!(stats.mean, 30.0);
        assert_eq!(stats.std, 0.0);
    }

    proptest! {
        #[test]
        fn prop_quantiles_are_monotonic(values in prop::collection::vec(-1.0e6f64..1.0e6, 2..64)) {
            let stats = DescriptiveStats::compute(&values);
            prop_assert!(stats.q1 <= stats.median);
            prop_assert!(stats.median <= stats.q3);
        }

        #[test]
        fn prop_short_input_has_zero_std(values in prop::collection::vec(-1.0e6f64..1.0e6, 0..2)) {
            prop_assert_eq!(DescriptiveStats::compute(&values).std, 0.0);
        }
    }
}
