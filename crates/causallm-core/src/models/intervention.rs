//! Interventional query results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Variables satisfying the backdoor criterion for one (treatment, outcome) query.
///
/// Query-specific; never stored on the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentSet {
    variables: Vec<String>,
}

impl AdjustmentSet {
    pub fn new(variables: Vec<String>) -> Self {
        Self { variables }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }
}

impl fmt::Display for AdjustmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.variables.join(", "))
    }
}

/// Estimator used to produce an effect estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// OLS of outcome on treatment plus adjusters; effect is the treatment coefficient.
    LinearRegression,
    /// Size-weighted difference of means across adjuster strata.
    Stratification,
}

impl EstimationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearRegression => "linear_regression",
            Self::Stratification => "stratification",
        }
    }
}

/// Outcome of an interventional effect estimate.
///
/// The adjustment set is always disclosed alongside the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionResult {
    pub treatment: String,
    pub outcome: String,
    pub adjustment_set: AdjustmentSet,
    pub effect_estimate: f64,
    pub confidence_interval: (f64, f64),
    pub method: EstimationMethod,
    pub sample_size: usize,
    pub bootstrap_replicates: usize,
}

impl InterventionResult {
    /// Whether the interval excludes zero.
    pub fn is_significant(&self) -> bool {
        let (lo, hi) = self.confidence_interval;
        lo > 0.0 || hi < 0.0
    }
}
