//! Descriptive statistics.

use nalgebra::DMatrix;

use crate::constants::{SINGULARITY_EPSILON, ZERO_VARIANCE_EPSILON};
use crate::errors::InsufficientDataError;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Pearson correlation matrix of equally long columns.
///
/// `names` label the columns for error reporting; a constant column is a
/// `ZeroVariance` error.
pub fn correlation_matrix(
    columns: &[Vec<f64>],
    names: &[&str],
) -> Result<DMatrix<f64>, InsufficientDataError> {
    let k = columns.len();
    let n = columns.first().map(Vec::len).unwrap_or(0);
    let means: Vec<f64> = columns.iter().map(|c| mean(c)).collect();
    let centered: Vec<Vec<f64>> = columns
        .iter()
        .zip(&means)
        .map(|(c, m)| c.iter().map(|v| v - m).collect())
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|c| c.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    for (i, norm) in norms.iter().enumerate() {
        if n < 2 || (norm * norm) / (n.max(2) - 1) as f64 <= ZERO_VARIANCE_EPSILON {
            return Err(InsufficientDataError::ZeroVariance {
                variable: names.get(i).copied().unwrap_or("?").to_string(),
            });
        }
    }

    let mut corr = DMatrix::identity(k, k);
    for i in 0..k {
        for j in (i + 1)..k {
            let dot: f64 = centered[i]
                .iter()
                .zip(&centered[j])
                .map(|(a, b)| a * b)
                .sum();
            let r = (dot / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            corr[(i, j)] = r;
            corr[(j, i)] = r;
        }
    }
    Ok(corr)
}

/// Inverse of a correlation matrix.
///
/// Fails when the smallest eigenvalue is negligible next to the largest,
/// which is where `try_inverse` would still succeed with garbage.
pub fn precision_matrix(
    corr: &DMatrix<f64>,
    context: &str,
) -> Result<DMatrix<f64>, InsufficientDataError> {
    let singular = || InsufficientDataError::SingularMatrix {
        context: context.to_string(),
    };
    if !corr.is_square() || corr.is_empty() {
        return Err(singular());
    }
    let eigen = corr.clone().symmetric_eigenvalues();
    if eigen.min() <= eigen.max().abs() * SINGULARITY_EPSILON {
        return Err(singular());
    }
    corr.clone().try_inverse().ok_or_else(singular)
}

/// Linear-interpolated quantile of an ascending slice, `q` in `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
