//! Effect-estimation configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Estimator requested for interventional effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Stratification for a binary categorical treatment with categorical
    /// adjusters, regression adjustment otherwise.
    #[default]
    Auto,
    Regression,
    Stratification,
}

/// Configuration for the estimation subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EstimationConfig {
    /// Bootstrap replicates for the confidence interval. Default: 200.
    pub bootstrap_samples: Option<usize>,
    /// Two-sided confidence level. Default: 0.95.
    pub confidence_level: Option<f64>,
    /// Seed for bootstrap resampling. Default: 42.
    pub seed: Option<u64>,
    /// Estimator selection. Default: auto.
    pub estimator: Option<EstimatorKind>,
    /// Largest adjustment set enumerated exhaustively. Default: 8.
    pub max_adjustment_set_size: Option<usize>,
}

impl EstimationConfig {
    pub fn effective_bootstrap_samples(&self) -> usize {
        self.bootstrap_samples
            .unwrap_or(constants::DEFAULT_BOOTSTRAP_SAMPLES)
    }

    pub fn effective_confidence_level(&self) -> f64 {
        self.confidence_level
            .unwrap_or(constants::DEFAULT_CONFIDENCE_LEVEL)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(constants::DEFAULT_BOOTSTRAP_SEED)
    }

    pub fn effective_estimator(&self) -> EstimatorKind {
        self.estimator.unwrap_or_default()
    }

    pub fn effective_max_adjustment_set_size(&self) -> usize {
        self.max_adjustment_set_size
            .unwrap_or(constants::DEFAULT_MAX_ADJUSTMENT_SET_SIZE)
    }
}
