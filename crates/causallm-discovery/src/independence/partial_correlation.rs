//! Gaussian partial-correlation test with Fisher's z transform.

use statrs::function::erf::erfc;

use causallm_core::constants::MAX_ABS_CORRELATION;
use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{Dataset, TestMethod, TestStatistic, Variable};
use causallm_core::stats::{correlation_matrix, precision_matrix};
use causallm_core::traits::IndependenceTest;

/// Partial correlation of `x` and `y` given the conditioning set, read off
/// the inverse of their joint correlation matrix.
///
/// Categorical codes are treated as numbers. Uses complete-case rows in
/// canonical order, so the statistic does not depend on row storage order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FisherZTest;

impl IndependenceTest for FisherZTest {
    fn test(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
    ) -> Result<TestStatistic, InsufficientDataError> {
        let names: Vec<&str> = [x.name(), y.name()]
            .into_iter()
            .chain(conditioning_set.iter().map(|v| v.name()))
            .collect();
        let rows = data.canonical_rows(&names)?;
        let n = rows.len();
        let k = conditioning_set.len();
        if n < k + 4 {
            return Err(InsufficientDataError::TooFewSamples {
                needed: k + 4,
                available: n,
            });
        }

        let columns = names
            .iter()
            .map(|name| {
                let column = data.require_column(name)?;
                Ok(rows.iter().map(|&r| column[r]).collect())
            })
            .collect::<Result<Vec<Vec<f64>>, InsufficientDataError>>()?;
        let corr = correlation_matrix(&columns, &names)?;

        let r = if k == 0 {
            corr[(0, 1)]
        } else {
            let precision =
                precision_matrix(&corr, &format!("correlation matrix of {}", names.join(", ")))?;
            let denom = (precision[(0, 0)] * precision[(1, 1)]).sqrt();
            if !(denom.is_finite() && denom > 0.0) {
                return Err(InsufficientDataError::SingularMatrix {
                    context: format!("precision matrix of {}", names.join(", ")),
                });
            }
            -precision[(0, 1)] / denom
        };

        let r = r.clamp(-MAX_ABS_CORRELATION, MAX_ABS_CORRELATION);
        let dof = (n - k - 3) as f64;
        let z = 0.5 * ((1.0 + r) / (1.0 - r)).ln();
        let statistic = dof.sqrt() * z.abs();
        // Two-sided normal tail: 2 * (1 - Phi(s)) = erfc(s / sqrt 2).
        let p_value = erfc(statistic / std::f64::consts::SQRT_2).clamp(0.0, 1.0);

        Ok(TestStatistic {
            statistic,
            p_value,
            degrees_of_freedom: dof,
            sample_size: n,
            method: TestMethod::FisherZ,
        })
    }
}
