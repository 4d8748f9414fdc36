//! Counterfactual queries and traces.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `do(variable = value)` applied to selected units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub variable: String,
    pub value: f64,
    /// Row indices to replay; `None` means every row.
    #[serde(default)]
    pub units: Option<Vec<usize>>,
}

impl Intervention {
    pub fn new(variable: impl Into<String>, value: f64) -> Self {
        Self {
            variable: variable.into(),
            value,
            units: None,
        }
    }

    pub fn for_units(mut self, units: Vec<usize>) -> Self {
        self.units = Some(units);
        self
    }
}

/// Alternate-world replay of one observed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualTrace {
    pub unit: usize,
    /// Observed value of every observed node.
    pub original: BTreeMap<String, f64>,
    /// Values forced by the intervention.
    pub intervened: BTreeMap<String, f64>,
    /// Counterfactual value of each descendant of the intervened node:
    /// recomputed when a parent changed, otherwise carried over from
    /// `original`. A descendant with no changed parent and no observed value
    /// has nothing to carry over and is absent.
    pub propagated: BTreeMap<String, f64>,
}

impl CounterfactualTrace {
    /// The full counterfactual world: observed values overlaid by the
    /// intervention and its propagated consequences.
    pub fn counterfactual_world(&self) -> BTreeMap<String, f64> {
        let mut world = self.original.clone();
        world.extend(self.intervened.iter().map(|(k, v)| (k.clone(), *v)));
        world.extend(self.propagated.iter().map(|(k, v)| (k.clone(), *v)));
        world
    }

    /// Counterfactual minus observed value for a node, if both are known.
    pub fn change(&self, node: &str) -> Option<f64> {
        let observed = self.original.get(node)?;
        let counterfactual = self
            .propagated
            .get(node)
            .or_else(|| self.intervened.get(node))
            .unwrap_or(observed);
        Some(counterfactual - observed)
    }
}
