//! Chi-squared distribution

use super::special::upper_regularized_gamma;

/// Survival function (upper tail), the p-value of a chi-squared statistic
pub fn chi_sf(x: f64, df: f64) -> f64 {
    if x.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if x.is_infinite() {
        return 0.0;
    }
    upper_regularized_gamma(df / 2.0, x / 2.0)
}
