//! Biostat Plugin System
//!
//! Provides the seams the analysis engine is configured through:
//! - Hypothesis-test primitives (`HypothesisTests`)
//! - The characteristic catalog (`CharacteristicRegistry`)
//! - Run-wide options bundled in an `AnalysisContext`

mod traits;
mod registry;
mod context;

pub use traits::{HypothesisTests, TestMethod, TestOutcome, TestSettings};
pub use registry::CharacteristicRegistry;
pub use context::{AnalysisContext, AnalysisOptions, NanPolicy};

/// Re-export core types for implementors
pub mod prelude {
    pub use crate::{
        AnalysisContext, AnalysisOptions, CharacteristicRegistry, HypothesisTests, NanPolicy,
        TestMethod, TestOutcome, TestSettings,
    };
    pub use biostat_core::prelude::*;
}
