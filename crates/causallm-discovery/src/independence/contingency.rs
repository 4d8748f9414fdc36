//! Stratified contingency-table tests for categorical variables.

use std::collections::BTreeMap;

use statrs::distribution::{ChiSquared, ContinuousCDF};

use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{Dataset, TestMethod, TestStatistic, Variable};
use causallm_core::traits::IndependenceTest;

/// Likelihood-ratio test: `G = 2 * sum(O * ln(O / E))` summed over strata.
#[derive(Debug, Clone, Copy, Default)]
pub struct GTest;

/// Pearson's test: `X2 = sum((O - E)^2 / E)` summed over strata.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChiSquaredTest;

impl IndependenceTest for GTest {
    fn test(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
    ) -> Result<TestStatistic, InsufficientDataError> {
        stratified(x, y, conditioning_set, data, TestMethod::GTest)
    }
}

impl IndependenceTest for ChiSquaredTest {
    fn test(
        &self,
        x: &Variable,
        y: &Variable,
        conditioning_set: &[&Variable],
        data: &Dataset,
    ) -> Result<TestStatistic, InsufficientDataError> {
        stratified(x, y, conditioning_set, data, TestMethod::ChiSquared)
    }
}

/// Counts of `(x code, y code)` within one conditioning configuration.
#[derive(Default)]
struct Table {
    cells: BTreeMap<(i64, i64), f64>,
    x_margin: BTreeMap<i64, f64>,
    y_margin: BTreeMap<i64, f64>,
    total: f64,
}

impl Table {
    fn add(&mut self, x: i64, y: i64) {
        *self.cells.entry((x, y)).or_default() += 1.0;
        *self.x_margin.entry(x).or_default() += 1.0;
        *self.y_margin.entry(y).or_default() += 1.0;
        self.total += 1.0;
    }

    /// Statistic contribution and degrees of freedom of this stratum.
    fn score(&self, method: TestMethod) -> (f64, usize) {
        let dof = self.x_margin.len().saturating_sub(1) * self.y_margin.len().saturating_sub(1);
        if dof == 0 {
            return (0.0, 0);
        }
        let mut stat = 0.0;
        for (&xv, &xc) in &self.x_margin {
            for (&yv, &yc) in &self.y_margin {
                let expected = xc * yc / self.total;
                let observed = self.cells.get(&(xv, yv)).copied().unwrap_or(0.0);
                stat += match method {
                    TestMethod::ChiSquared => (observed - expected).powi(2) / expected,
                    _ if observed > 0.0 => 2.0 * observed * (observed / expected).ln(),
                    _ => 0.0,
                };
            }
        }
        (stat, dof)
    }
}

fn stratified(
    x: &Variable,
    y: &Variable,
    conditioning_set: &[&Variable],
    data: &Dataset,
    method: TestMethod,
) -> Result<TestStatistic, InsufficientDataError> {
    let names: Vec<&str> = [x.name(), y.name()]
        .into_iter()
        .chain(conditioning_set.iter().map(|v| v.name()))
        .collect();
    let rows = data.canonical_rows(&names)?;
    if rows.is_empty() {
        return Err(InsufficientDataError::TooFewSamples {
            needed: 1,
            available: 0,
        });
    }

    let xs = data.require_column(x.name())?;
    let ys = data.require_column(y.name())?;
    let zs = conditioning_set
        .iter()
        .map(|v| data.require_column(v.name()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut strata: BTreeMap<Vec<i64>, Table> = BTreeMap::new();
    for &r in &rows {
        let key: Vec<i64> = zs.iter().map(|c| c[r] as i64).collect();
        strata.entry(key).or_default().add(xs[r] as i64, ys[r] as i64);
    }

    let (statistic, dof) = strata
        .values()
        .map(|t| t.score(method))
        .fold((0.0, 0usize), |(s, d), (ts, td)| (s + ts, d + td));
    if dof == 0 {
        return Err(InsufficientDataError::NoDegreesOfFreedom {
            x: x.name().to_string(),
            y: y.name().to_string(),
        });
    }

    let distribution =
        ChiSquared::new(dof as f64).map_err(|_| InsufficientDataError::NoDegreesOfFreedom {
            x: x.name().to_string(),
            y: y.name().to_string(),
        })?;
    let p_value = distribution.sf(statistic.max(0.0)).clamp(0.0, 1.0);

    Ok(TestStatistic {
        statistic,
        p_value,
        degrees_of_freedom: dof as f64,
        sample_size: rows.len(),
        method,
    })
}
