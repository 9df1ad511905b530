//! Helper functions for statistical operations

use biostat_core::StatsError;

/// Require non-empty sample
pub fn require_non_empty(values: &[f64], func: &'static str) -> Result<(), StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySample(func));
    }
    Ok(())
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean, NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

/// Variance (sample or population). NaN when undefined.
pub fn variance_impl(values: &[f64], sample: bool) -> f64 {
    let n = values.len();
    let divisor = if sample { n.saturating_sub(1) } else { n };
    if divisor == 0 {
        return f64::NAN;
    }

    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    ss / divisor as f64
}

/// Sort values (returns new sorted vector). NaN sorts last.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile (0..=100) of sorted values using linear interpolation between
/// order statistics at rank p/100 * (n-1). NaN for an empty slice.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let floor_idx = rank.floor() as usize;
    let ceil_idx = (rank.ceil() as usize).min(n - 1);

    if floor_idx == ceil_idx {
        return sorted[floor_idx];
    }

    let lower = sorted[floor_idx];
    let upper = sorted[ceil_idx];
    lower + (upper - lower) * (rank - floor_idx as f64)
}
