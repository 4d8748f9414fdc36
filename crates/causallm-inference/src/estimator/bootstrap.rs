//! Percentile bootstrap for effect intervals.
//!
//! Replicate `b` draws its rows from `ChaCha8Rng::seed_from_u64(seed + b)`, so
//! the interval is the same whether replicates run on one thread or many.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use causallm_core::errors::InsufficientDataError;
use causallm_core::stats::quantile_sorted;

use super::{EffectEstimator, EstimationSample};

/// Percentile interval and the replicates that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapInterval {
    pub lower: f64,
    pub upper: f64,
    /// Replicates that yielded an estimate.
    pub replicates: usize,
}

/// Resample rows with replacement `replicates` times and take the
/// `(1 - level) / 2` and `(1 + level) / 2` quantiles of the estimates.
///
/// Replicates whose estimate fails (e.g. a resample with one treatment level)
/// are dropped; fewer than half succeeding is an error.
pub fn bootstrap_interval(
    estimator: &dyn EffectEstimator,
    sample: &EstimationSample,
    replicates: usize,
    level: f64,
    seed: u64,
) -> Result<BootstrapInterval, InsufficientDataError> {
    let n = sample.len();
    if n == 0 {
        return Err(InsufficientDataError::TooFewSamples {
            needed: 1,
            available: 0,
        });
    }
    let outcomes: Vec<Result<f64, InsufficientDataError>> = (0..replicates)
        .into_par_iter()
        .map(|b| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(b as u64));
            let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            estimator.estimate(sample, &rows)
        })
        .collect();

    let mut estimates: Vec<f64> = outcomes
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.is_finite())
        .collect();
    let failed = replicates - estimates.len();
    if failed > 0 {
        warn!(failed, requested = replicates, "bootstrap replicates without an estimate dropped");
    }
    if estimates.is_empty() || estimates.len() * 2 < replicates {
        return Err(InsufficientDataError::BootstrapFailed {
            succeeded: estimates.len(),
            requested: replicates,
        });
    }

    estimates.sort_by(f64::total_cmp);
    let tail = (1.0 - level) / 2.0;
    let interval = BootstrapInterval {
        lower: quantile_sorted(&estimates, tail),
        upper: quantile_sorted(&estimates, 1.0 - tail),
        replicates: estimates.len(),
    };
    debug!(lower = interval.lower, upper = interval.upper, replicates = interval.replicates, "bootstrap interval");
    Ok(interval)
}
