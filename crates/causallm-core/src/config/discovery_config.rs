//! Discovery configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::models::DiscoveryMethod;

/// Which conditional-independence test the PC algorithm uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiTestSelection {
    /// Partial correlation for continuous/mixed pairs, G-test for categorical ones.
    #[default]
    Auto,
    PartialCorrelation,
    GTest,
    ChiSquared,
}

/// Configuration for the discovery subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Significance threshold for independence judgments. Default: 0.05.
    pub significance: Option<f64>,
    /// Largest conditioning-set size explored by the skeleton phase. Default: unbounded.
    pub max_conditioning_size: Option<usize>,
    /// Evaluate pair tests within a level in parallel. Default: true.
    pub parallel: Option<bool>,
    /// Independence test selection. Default: auto.
    pub ci_test: Option<CiTestSelection>,
    /// Discovery method used when a caller does not name one. Default: hybrid.
    pub default_method: Option<DiscoveryMethod>,
}

impl DiscoveryConfig {
    /// Returns the effective significance threshold, defaulting to 0.05.
    pub fn effective_significance(&self) -> f64 {
        self.significance.unwrap_or(constants::DEFAULT_SIGNIFICANCE)
    }

    /// Returns whether pair tests run in parallel, defaulting to true.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Returns the effective test selection, defaulting to auto.
    pub fn effective_ci_test(&self) -> CiTestSelection {
        self.ci_test.unwrap_or_default()
    }

    /// Returns the effective default discovery method, defaulting to hybrid.
    pub fn effective_default_method(&self) -> DiscoveryMethod {
        self.default_method.unwrap_or_default()
    }
}
