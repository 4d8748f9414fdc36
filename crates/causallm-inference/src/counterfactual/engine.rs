//! Abduction, action, prediction over observed units.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use causallm_core::errors::{CounterfactualError, CounterfactualUnidentifiableError};
use causallm_core::models::{CounterfactualTrace, Dataset, Intervention, VariableKind};
use causallm_graph::CausalGraph;

use super::scm::StructuralModel;

/// Replays observed units in the world where one variable was forced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterfactualEngine;

impl CounterfactualEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate the query, fit the structural model for everything downstream
    /// of the intervened node, and return a lazy per-unit replay.
    ///
    /// Structural problems fail here; a unit that cannot be replayed fails
    /// only its own item.
    pub fn generate_counterfactuals<'a>(
        &self,
        data: &'a Dataset,
        intervention: &Intervention,
        graph: &CausalGraph,
    ) -> Result<CounterfactualIter<'a>, CounterfactualError> {
        let variable = intervention.variable.as_str();
        if !graph.contains(variable) {
            return Err(CounterfactualError::UnknownVariable {
                name: variable.to_string(),
            });
        }
        if !data.contains(variable) {
            return Err(CounterfactualError::UnobservedVariable {
                name: variable.to_string(),
            });
        }
        check_value(data, variable, intervention.value)?;
        graph.require_oriented()?;

        let rows = data.n_rows();
        let units = match &intervention.units {
            Some(units) => {
                if let Some(&unit) = units.iter().find(|&&u| u >= rows) {
                    return Err(CounterfactualError::UnitOutOfRange { unit, rows });
                }
                units.clone()
            }
            None => (0..rows).collect(),
        };

        let downstream_set: BTreeSet<&str> = graph.descendants(variable).into_iter().collect();
        let downstream: Vec<&str> = graph
            .topological_order()?
            .into_iter()
            .filter(|n| downstream_set.contains(n))
            .collect();
        let model = StructuralModel::fit(graph, data, &downstream);

        info!(
            variable,
            value = intervention.value,
            units = units.len(),
            downstream = downstream.len(),
            "counterfactual replay prepared"
        );

        Ok(CounterfactualIter {
            data,
            variable: variable.to_string(),
            value: intervention.value,
            plan: downstream
                .iter()
                .map(|&n| {
                    let parents = graph.parents(n).into_iter().map(str::to_string).collect();
                    (n.to_string(), parents)
                })
                .collect(),
            observed: graph
                .node_names()
                .into_iter()
                .filter(|n| data.contains(n))
                .map(str::to_string)
                .collect(),
            model,
            units: units.into_iter(),
        })
    }
}

/// The forced value must be finite, and a valid category code for a
/// categorical variable.
fn check_value(data: &Dataset, variable: &str, value: f64) -> Result<(), CounterfactualError> {
    let reason = if !value.is_finite() {
        Some("value is not finite")
    } else if data.variable(variable).map(|v| v.kind()) == Some(VariableKind::Categorical)
        && (value.fract() != 0.0 || value < 0.0)
    {
        Some("categorical values are non-negative integer codes")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(CounterfactualError::InvalidInterventionValue {
            name: variable.to_string(),
            value,
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Lazy, finite, single-pass replay of the requested units.
///
/// Yields one item per unit, in request order.
#[derive(Debug)]
pub struct CounterfactualIter<'a> {
    data: &'a Dataset,
    variable: String,
    value: f64,
    /// Downstream nodes in topological order, with their parents.
    plan: Vec<(String, Vec<String>)>,
    observed: Vec<String>,
    model: StructuralModel,
    units: std::vec::IntoIter<usize>,
}

impl<'a> CounterfactualIter<'a> {
    /// Only the units that could be replayed; the others are logged and skipped.
    pub fn successful(self) -> impl Iterator<Item = CounterfactualTrace> + 'a {
        self.filter_map(|item| match item {
            Ok(trace) => Some(trace),
            Err(e) => {
                warn!(
                    unit = e.unit,
                    node = e.node.as_str(),
                    reason = e.reason.as_str(),
                    "counterfactual unit skipped"
                );
                None
            }
        })
    }

    fn replay(&self, unit: usize) -> Result<CounterfactualTrace, CounterfactualUnidentifiableError> {
        let original: BTreeMap<String, f64> = self
            .observed
            .iter()
            .filter_map(|n| {
                self.data
                    .value(unit, n)
                    .filter(|v| !v.is_nan())
                    .map(|v| (n.clone(), v))
            })
            .collect();

        let mut world: BTreeMap<&str, f64> = BTreeMap::new();
        world.insert(&self.variable, self.value);
        let mut propagated = BTreeMap::new();

        for (node, parents) in &self.plan {
            let changed = parents.iter().any(|p| match world.get(p.as_str()) {
                Some(now) => original.get(p) != Some(now),
                None => false,
            });

            if !changed {
                if let Some(&v) = original.get(node) {
                    propagated.insert(node.clone(), v);
                }
                continue;
            }

            let fail = |reason: String| CounterfactualUnidentifiableError {
                unit,
                node: node.clone(),
                reason,
            };
            let assignment = self.model.assignment(node).map_err(|r| fail(r.to_string()))?;
            let observed = *original
                .get(node)
                .ok_or_else(|| fail("observed value is missing, residual unknown".to_string()))?;

            let mut before = Vec::with_capacity(parents.len());
            let mut after = Vec::with_capacity(parents.len());
            for p in parents {
                let seen = *original
                    .get(p)
                    .ok_or_else(|| fail(format!("parent {p} has no observed value")))?;
                before.push(seen);
                after.push(world.get(p.as_str()).copied().unwrap_or(seen));
            }

            let residual = observed - assignment.predict(&before);
            let value = assignment.predict(&after) + residual;
            world.insert(node, value);
            propagated.insert(node.clone(), value);
        }

        Ok(CounterfactualTrace {
            unit,
            original,
            intervened: BTreeMap::from([(self.variable.clone(), self.value)]),
            propagated,
        })
    }
}

impl Iterator for CounterfactualIter<'_> {
    type Item = Result<CounterfactualTrace, CounterfactualUnidentifiableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let unit = self.units.next()?;
        Some(self.replay(unit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.units.size_hint()
    }
}

impl ExactSizeIterator for CounterfactualIter<'_> {}
