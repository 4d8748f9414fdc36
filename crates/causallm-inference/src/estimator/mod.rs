//! Effect estimators over an adjusted sample.
//!
//! The sample is extracted once, in canonical row order, so every estimator
//! and every bootstrap replicate sees the same rows no matter how the caller's
//! dataset was ordered.

pub mod bootstrap;
pub mod regression;
pub mod stratification;

pub use bootstrap::{bootstrap_interval, BootstrapInterval};
pub use regression::RegressionEstimator;
pub use stratification::StratificationEstimator;

use causallm_core::config::EstimatorKind;
use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{AdjustmentSet, Dataset, EstimationMethod, VariableKind};

/// One column of the adjusted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariate {
    pub name: String,
    pub kind: VariableKind,
    pub values: Vec<f64>,
}

/// Treatment, outcome and adjusters over the complete rows, canonically ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationSample {
    pub treatment: Covariate,
    pub outcome: Covariate,
    pub adjusters: Vec<Covariate>,
}

impl EstimationSample {
    /// Extract the complete rows of `treatment`, `outcome` and the adjusters.
    pub fn extract(
        data: &Dataset,
        treatment: &str,
        outcome: &str,
        adjustment: &AdjustmentSet,
    ) -> Result<Self, InsufficientDataError> {
        let mut names = vec![treatment, outcome];
        names.extend(adjustment.iter());
        let rows = data.canonical_rows(&names)?;

        let take = |name: &str| -> Result<Covariate, InsufficientDataError> {
            let column = data.require_column(name)?;
            let kind = data
                .variable(name)
                .map(|v| v.kind())
                .unwrap_or_default();
            Ok(Covariate {
                name: name.to_string(),
                kind,
                values: rows.iter().map(|&r| column[r]).collect(),
            })
        };

        Ok(Self {
            treatment: take(treatment)?,
            outcome: take(outcome)?,
            adjusters: adjustment.iter().map(take).collect::<Result<_, _>>()?,
        })
    }

    pub fn len(&self) -> usize {
        self.outcome.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row, in canonical order.
    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    /// Binary categorical treatment and only categorical adjusters.
    pub fn is_stratifiable(&self) -> bool {
        self.treatment.kind == VariableKind::Categorical
            && distinct(&self.treatment.values).len() == 2
            && self
                .adjusters
                .iter()
                .all(|a| a.kind == VariableKind::Categorical)
    }
}

/// Point estimate of the average effect of the treatment on the outcome.
pub trait EffectEstimator: Send + Sync {
    fn method(&self) -> EstimationMethod;

    /// Estimate over the given rows of the sample; rows may repeat.
    fn estimate(&self, sample: &EstimationSample, rows: &[usize]) -> Result<f64, InsufficientDataError>;
}

/// Resolve the configured estimator against the sample at hand.
pub fn select_estimator(kind: EstimatorKind, sample: &EstimationSample) -> Box<dyn EffectEstimator> {
    match kind {
        EstimatorKind::Regression => Box::new(RegressionEstimator),
        EstimatorKind::Stratification => Box::new(StratificationEstimator),
        EstimatorKind::Auto if sample.is_stratifiable() => Box::new(StratificationEstimator),
        EstimatorKind::Auto => Box::new(RegressionEstimator),
    }
}

/// Distinct non-missing values, ascending.
pub(crate) fn distinct(values: &[f64]) -> Vec<f64> {
    let mut levels: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();
    levels
}
