//! Biostat Statistics
//!
//! Numerical building blocks for the analysis engine:
//! - `DescriptiveStats`: median, quartiles, mean and sample standard deviation
//! - `StandardTests`: the built-in `HypothesisTests` implementation
//! - Student's t, chi-squared and F distribution functions
//!
//! Nothing here panics on degenerate input; statistics that do not exist come
//! back as NaN.

mod helpers;
mod descriptive;
mod hypothesis;
pub mod distributions;

use biostat_plugin::{AnalysisContext, CharacteristicRegistry};
use std::sync::Arc;

pub use descriptive::DescriptiveStats;
pub use hypothesis::StandardTests;

/// Context wired with the standard characteristic table and built-in tests
pub fn standard_context() -> AnalysisContext {
    AnalysisContext::new(
        Arc::new(CharacteristicRegistry::standard()),
        Arc::new(StandardTests::new()),
    )
}
