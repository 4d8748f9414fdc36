//! Ordinary least squares through a thin SVD of the design matrix.

use nalgebra::{DMatrix, DVector};

use crate::constants::SINGULARITY_EPSILON;
use crate::errors::InsufficientDataError;

/// Fitted linear model.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// One coefficient per design column, in design order.
    pub coefficients: Vec<f64>,
    /// Observed minus fitted, one per design row.
    pub residuals: Vec<f64>,
}

impl OlsFit {
    /// Prediction for one design row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coefficients.iter().zip(row).map(|(b, x)| b * x).sum()
    }

    /// Residual variance with `n - p` degrees of freedom.
    pub fn residual_variance(&self) -> f64 {
        let dof = self.residuals.len().saturating_sub(self.coefficients.len());
        if dof == 0 {
            return 0.0;
        }
        self.residuals.iter().map(|r| r * r).sum::<f64>() / dof as f64
    }
}

/// Regress `y` on the design matrix (rows are observations; include an
/// intercept column explicitly if wanted).
///
/// A design whose numerical rank is below its column count is a
/// `SingularMatrix` error rather than a minimum-norm fit.
pub fn ols(design: &[Vec<f64>], y: &[f64]) -> Result<OlsFit, InsufficientDataError> {
    let n = design.len();
    let p = design.first().map(Vec::len).unwrap_or(0);
    if n != y.len() || n <= p || p == 0 {
        return Err(InsufficientDataError::TooFewSamples {
            needed: p + 1,
            available: n.min(y.len()),
        });
    }
    if design.iter().any(|row| row.len() != p) {
        return Err(InsufficientDataError::SingularMatrix {
            context: "ragged least-squares design".to_string(),
        });
    }

    let x = DMatrix::from_fn(n, p, |i, j| design[i][j]);
    let b = DVector::from_column_slice(y);

    let svd = x.clone().svd(true, true);
    let tolerance = svd.singular_values.max() * SINGULARITY_EPSILON;
    let singular = || InsufficientDataError::SingularMatrix {
        context: "least-squares design".to_string(),
    };
    if !tolerance.is_finite() || svd.rank(tolerance) < p {
        return Err(singular());
    }
    let beta = svd.solve(&b, tolerance).map_err(|_| singular())?;

    let residuals = (&b - &x * &beta).iter().copied().collect();
    Ok(OlsFit {
        coefficients: beta.iter().copied().collect(),
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_an_ill_conditioned_fit() {
        // Columns nearly collinear: normal equations would square this condition number.
        let design: Vec<Vec<f64>> = (0..50)
            .map(|i| {
                let t = i as f64;
                vec![1.0, t, t + 1e-6 * (t * t)]
            })
            .collect();
        let y: Vec<f64> = design.iter().map(|r| 1.0 + 2.0 * r[1] + 3.0 * r[2]).collect();
        let fit = ols(&design, &y).unwrap();
        assert!(fit.residuals.iter().all(|r| r.abs() < 1e-6));
    }

    #[test]
    fn ragged_design_is_rejected() {
        let design = vec![vec![1.0, 0.0], vec![1.0], vec![1.0, 2.0]];
        assert!(matches!(
            ols(&design, &[0.0, 1.0, 2.0]),
            Err(InsufficientDataError::SingularMatrix { .. })
        ));
    }
}
