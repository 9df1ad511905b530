//! Analysis Context

use crate::{CharacteristicRegistry, HypothesisTests, TestSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What happens to values whose numeric coercion failed (NaN)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanPolicy {
    /// Remove them before descriptive statistics and tests. Raw grouped data
    /// still carry them.
    #[default]
    Drop,
    /// Pass them through and let the numbers turn NaN
    Propagate,
}

impl NanPolicy {
    /// The values a computation should see under this policy
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        match self {
            NanPolicy::Drop => values.iter().copied().filter(|v| !v.is_nan()).collect(),
            NanPolicy::Propagate => values.to_vec(),
        }
    }
}

/// Tunables of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub alpha: f64,
    pub nan_policy: NanPolicy,
    pub yates_correction: bool,
    /// Label of the aggregate row appended by the raw overview
    pub total_label: String,
}

impl AnalysisOptions {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_nan_policy(mut self, policy: NanPolicy) -> Self {
        self.nan_policy = policy;
        self
    }

    pub fn with_yates_correction(mut self, enabled: bool) -> Self {
        self.yates_correction = enabled;
        self
    }

    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    pub fn test_settings(&self) -> TestSettings {
        TestSettings {
            alpha: self.alpha,
            yates_correction: self.yates_correction,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            nan_policy: NanPolicy::Drop,
            yates_correction: true,
            total_label: "Total".to_string(),
        }
    }
}

/// Read-only configuration shared by every analysis call
#[derive(Clone)]
pub struct AnalysisContext {
    pub registry: Arc<CharacteristicRegistry>,
    pub tests: Arc<dyn HypothesisTests>,
    pub options: AnalysisOptions,
}

impl AnalysisContext {
    pub fn new(registry: Arc<CharacteristicRegistry>, tests: Arc<dyn HypothesisTests>) -> Self {
        Self {
            registry,
            tests,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn settings(&self) -> TestSettings {
        self.options.test_settings()
    }
}

impl std::fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("registry", &self.registry.len())
            .field("tests", &self.tests.name())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_policy_apply() {
        let values = [1.0, f64::NAN, 3.0];
        assert_eq!(NanPolicy::Drop.apply(&values), vec![1.0, 3.0]);
        let kept = NanPolicy::Propagate.apply(&values);
        assert_eq!(kept.len(), 3);
        assert!(kept[1].is_nan());
    }

    #[test]
    fn test_options_builder() {
        let options = AnalysisOptions::default()
            .with_alpha(0.01)
            .with_yates_correction(false)
            .with_total_label("Ensemble");
        let settings = options.test_settings();
        assert_eq!(settings.alpha, 0.01);
        assert!(!settings.yates_correction);
        assert_eq!(options.total_label, "Ensemble");
        assert_eq!(options.nan_policy, NanPolicy::Drop);
    }
}
