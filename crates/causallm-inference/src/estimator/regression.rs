//! Linear regression adjustment.

use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{EstimationMethod, VariableKind};
use causallm_core::stats::ols;

use super::{distinct, Covariate, EffectEstimator, EstimationSample};

/// OLS of the outcome on an intercept, the treatment and the adjusters.
///
/// The effect is the treatment coefficient. Categorical adjusters enter as
/// indicator columns for every level but the lowest one observed in the rows
/// being fitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionEstimator;

impl EffectEstimator for RegressionEstimator {
    fn method(&self) -> EstimationMethod {
        EstimationMethod::LinearRegression
    }

    fn estimate(&self, sample: &EstimationSample, rows: &[usize]) -> Result<f64, InsufficientDataError> {
        let encoders: Vec<Encoder> = sample
            .adjusters
            .iter()
            .map(|a| Encoder::for_rows(a, rows))
            .collect();

        let design: Vec<Vec<f64>> = rows
            .iter()
            .map(|&r| {
                let mut row = vec![1.0, sample.treatment.values[r]];
                for (adjuster, encoder) in sample.adjusters.iter().zip(&encoders) {
                    encoder.push(adjuster.values[r], &mut row);
                }
                row
            })
            .collect();
        let y: Vec<f64> = rows.iter().map(|&r| sample.outcome.values[r]).collect();

        let fit = ols(&design, &y)?;
        Ok(fit.coefficients[1])
    }
}

enum Encoder {
    Numeric,
    Dummies(Vec<f64>),
}

impl Encoder {
    fn for_rows(covariate: &Covariate, rows: &[usize]) -> Self {
        match covariate.kind {
            VariableKind::Continuous => Self::Numeric,
            VariableKind::Categorical => {
                let observed: Vec<f64> = rows.iter().map(|&r| covariate.values[r]).collect();
                Self::Dummies(distinct(&observed).into_iter().skip(1).collect())
            }
        }
    }

    fn push(&self, value: f64, row: &mut Vec<f64>) {
        match self {
            Self::Numeric => row.push(value),
            Self::Dummies(levels) => {
                row.extend(levels.iter().map(|&l| if value == l { 1.0 } else { 0.0 }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covariate(name: &str, kind: VariableKind, values: Vec<f64>) -> Covariate {
        Covariate {
            name: name.to_string(),
            kind,
            values,
        }
    }

    #[test]
    fn recovers_coefficient_with_dummy_adjuster() {
        // y = 2t + 3*[z == 1] + 5*[z == 2], exactly.
        let z = vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
        let t = vec![0.0, 1.0, 2.0, 1.0, 2.0, 0.0, 2.0, 0.0, 1.0];
        let y: Vec<f64> = t
            .iter()
            .zip(&z)
            .map(|(&t, &z)| 2.0 * t + if z == 1.0 { 3.0 } else if z == 2.0 { 5.0 } else { 0.0 })
            .collect();
        let sample = EstimationSample {
            treatment: covariate("t", VariableKind::Continuous, t),
            outcome: covariate("y", VariableKind::Continuous, y),
            adjusters: vec![covariate("z", VariableKind::Categorical, z)],
        };
        let effect = RegressionEstimator.estimate(&sample, &sample.all_rows()).unwrap();
        assert!((effect - 2.0).abs() < 1e-9);
    }

    #[test]
    fn constant_treatment_is_singular() {
        let sample = EstimationSample {
            treatment: covariate("t", VariableKind::Continuous, vec![1.0; 5]),
            outcome: covariate("y", VariableKind::Continuous, vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            adjusters: Vec::new(),
        };
        let err = RegressionEstimator.estimate(&sample, &sample.all_rows()).unwrap_err();
        assert!(matches!(err, InsufficientDataError::SingularMatrix { .. }));
    }
}
