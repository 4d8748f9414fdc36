//! Conditional-independence test seam.

use crate::errors::InsufficientDataError;
use crate::models::{Dataset, TestStatistic, Variable};

/// Tests `x ⫫ y | conditioning_set` on a dataset.
///
/// Implementations return the raw statistic and p-value; the significance
/// threshold is applied by the caller. Degenerate inputs return
/// `InsufficientDataError` instead of a misleading statistic.
pub trait IndependenceTest: Send + Sync {
    fn test(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
    ) -> Result<TestStatistic, InsufficientDataError>;
}
