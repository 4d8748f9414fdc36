//! Conditional-independence test outputs.

use serde::{Deserialize, Serialize};

/// Statistical procedure behind a test statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    /// Gaussian partial correlation with Fisher's z transform.
    FisherZ,
    /// Likelihood-ratio G statistic over stratified contingency tables.
    GTest,
    /// Pearson chi-squared over stratified contingency tables.
    ChiSquared,
}

/// Raw output of an independence test: no policy applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub sample_size: usize,
    pub method: TestMethod,
}

/// A judged independence test between two variables given a conditioning set.
///
/// Produced fresh per test; never cached across conditioning sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependenceResult {
    pub x: String,
    pub y: String,
    pub conditioning_set: Vec<String>,
    pub is_independent: bool,
    pub statistic: f64,
    pub p_value: f64,
    pub degrees_of_freedom: f64,
    pub method: TestMethod,
}

impl IndependenceResult {
    /// Apply a significance threshold to a raw statistic.
    ///
    /// Independence is accepted when the p-value exceeds `alpha`.
    pub fn judge(
        x: &str,
        y: &str,
        conditioning_set: &[&str],
        raw: &TestStatistic,
        alpha: f64,
    ) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            conditioning_set: conditioning_set.iter().map(|s| s.to_string()).collect(),
            is_independent: raw.p_value > alpha,
            statistic: raw.statistic,
            p_value: raw.p_value,
            degrees_of_freedom: raw.degrees_of_freedom,
            method: raw.method,
        }
    }
}
