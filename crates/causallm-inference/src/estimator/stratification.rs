//! Stratified difference of means.

use std::collections::BTreeMap;

use causallm_core::errors::InsufficientDataError;
use causallm_core::models::EstimationMethod;

use super::{distinct, EffectEstimator, EstimationSample};

/// Within each adjuster configuration, mean outcome of the higher treatment
/// level minus the lower one; strata are weighted by size.
///
/// Strata holding only one treatment level carry no contrast and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StratificationEstimator;

#[derive(Default)]
struct Stratum {
    treated_sum: f64,
    treated: usize,
    control_sum: f64,
    control: usize,
}

impl EffectEstimator for StratificationEstimator {
    fn method(&self) -> EstimationMethod {
        EstimationMethod::Stratification
    }

    fn estimate(&self, sample: &EstimationSample, rows: &[usize]) -> Result<f64, InsufficientDataError> {
        let levels = distinct(&sample.treatment.values);
        let [control_level, treated_level] = levels[..] else {
            return Err(InsufficientDataError::NonBinaryTreatment {
                treatment: sample.treatment.name.clone(),
                levels: levels.len(),
            });
        };

        let mut strata: BTreeMap<Vec<u64>, Stratum> = BTreeMap::new();
        for &r in rows {
            let key = sample.adjusters.iter().map(|a| a.values[r].to_bits()).collect();
            let stratum = strata.entry(key).or_default();
            let y = sample.outcome.values[r];
            let t = sample.treatment.values[r];
            if t == treated_level {
                stratum.treated_sum += y;
                stratum.treated += 1;
            } else if t == control_level {
                stratum.control_sum += y;
                stratum.control += 1;
            }
        }

        let mut weighted = 0.0;
        let mut weight = 0usize;
        for s in strata.values().filter(|s| s.treated > 0 && s.control > 0) {
            let size = s.treated + s.control;
            let contrast = s.treated_sum / s.treated as f64 - s.control_sum / s.control as f64;
            weighted += contrast * size as f64;
            weight += size;
        }

        if weight == 0 {
            return Err(InsufficientDataError::NoOverlap {
                treatment: sample.treatment.name.clone(),
            });
        }
        Ok(weighted / weight as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::Covariate;
    use causallm_core::models::VariableKind;

    fn categorical(name: &str, values: Vec<f64>) -> Covariate {
        Covariate {
            name: name.to_string(),
            kind: VariableKind::Categorical,
            values,
        }
    }

    #[test]
    fn weights_strata_by_size() {
        // Stratum z=0 (4 rows) has contrast 1, stratum z=1 (2 rows) has contrast 4.
        let sample = EstimationSample {
            treatment: categorical("t", vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
            outcome: Covariate {
                name: "y".into(),
                kind: VariableKind::Continuous,
                values: vec![0.0, 1.0, 2.0, 3.0, 0.0, 4.0],
            },
            adjusters: vec![categorical("z", vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0])],
        };
        let effect = StratificationEstimator
            .estimate(&sample, &sample.all_rows())
            .unwrap();
        assert!((effect - (1.0 * 4.0 + 4.0 * 2.0) / 6.0).abs() < 1e-12);
    }

    #[test]
    fn no_overlap_and_non_binary() {
        let separated = EstimationSample {
            treatment: categorical("t", vec![0.0, 0.0, 1.0, 1.0]),
            outcome: categorical("y", vec![0.0, 1.0, 0.0, 1.0]),
            adjusters: vec![categorical("z", vec![0.0, 0.0, 1.0, 1.0])],
        };
        assert_eq!(
            StratificationEstimator.estimate(&separated, &separated.all_rows()),
            Err(InsufficientDataError::NoOverlap { treatment: "t".into() })
        );

        let three = EstimationSample {
            treatment: categorical("t", vec![0.0, 1.0, 2.0]),
            outcome: categorical("y", vec![0.0, 1.0, 0.0]),
            adjusters: Vec::new(),
        };
        assert_eq!(
            StratificationEstimator.estimate(&three, &three.all_rows()),
            Err(InsufficientDataError::NonBinaryTreatment {
                treatment: "t".into(),
                levels: 3
            })
        );
    }
}
