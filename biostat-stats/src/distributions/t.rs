//! Student's t distribution

use super::special::regularized_incomplete_beta;

/// Two-tailed p-value of a t statistic. NaN when either input is NaN or
/// `df` is not positive.
pub fn t_two_tailed_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tailed_p_at_zero() {
        assert!((t_two_tailed_p(0.0, 10.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_two_tailed_p() {
        // t(0.975, 30) = 2.042272
        assert!((t_two_tailed_p(2.042272, 30.0) - 0.05).abs() < 1e-5);
        assert_eq!(t_two_tailed_p(-2.042272, 30.0), t_two_tailed_p(2.042272, 30.0));
        assert_eq!(t_two_tailed_p(f64::INFINITY, 5.0), 0.0);
        assert!(t_two_tailed_p(1.0, 0.0).is_nan());
        assert!(t_two_tailed_p(f64::NAN, 3.0).is_nan());
    }
}
