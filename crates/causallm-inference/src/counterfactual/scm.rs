//! Linear additive-noise structural model.

use std::collections::BTreeMap;

use tracing::debug;

use causallm_core::errors::InsufficientDataError;
use causallm_core::models::{Dataset, VariableKind};
use causallm_core::stats::ols;
use causallm_graph::CausalGraph;

/// `node = intercept + sum(coefficient * parent) + residual`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralAssignment {
    pub node: String,
    /// Parents in graph registration order.
    pub parents: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl StructuralAssignment {
    /// OLS of the node on its parents over canonical complete rows.
    /// A parentless node fits its mean.
    pub fn fit(data: &Dataset, node: &str, parents: &[&str]) -> Result<Self, InsufficientDataError> {
        let mut names = Vec::with_capacity(parents.len() + 1);
        names.push(node);
        names.extend_from_slice(parents);
        let rows = data.canonical_rows(&names)?;

        let y_column = data.require_column(node)?;
        let parent_columns = parents
            .iter()
            .map(|p| data.require_column(p))
            .collect::<Result<Vec<_>, _>>()?;

        let design: Vec<Vec<f64>> = rows
            .iter()
            .map(|&r| {
                std::iter::once(1.0)
                    .chain(parent_columns.iter().map(|c| c[r]))
                    .collect()
            })
            .collect();
        let y: Vec<f64> = rows.iter().map(|&r| y_column[r]).collect();

        let fit = ols(&design, &y)?;
        Ok(Self {
            node: node.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            intercept: fit.coefficients[0],
            coefficients: fit.coefficients[1..].to_vec(),
        })
    }

    /// Fitted value for parent values given in `parents` order.
    pub fn predict(&self, parent_values: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(parent_values)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Assignments for the nodes a counterfactual may need to recompute.
///
/// Nodes that cannot carry a linear assignment keep the reason instead, so a
/// unit that needs them fails on its own without aborting the batch.
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    assignments: BTreeMap<String, Result<StructuralAssignment, String>>,
}

impl StructuralModel {
    /// Fit every node in `nodes` from its graph parents.
    pub fn fit(graph: &CausalGraph, data: &Dataset, nodes: &[&str]) -> Self {
        let assignments = nodes
            .iter()
            .map(|&node| {
                let fitted = fit_node(graph, data, node);
                if let Err(reason) = &fitted {
                    debug!(node, reason = reason.as_str(), "no structural assignment");
                }
                (node.to_string(), fitted)
            })
            .collect();
        Self { assignments }
    }

    /// The node's assignment, or why it has none.
    pub fn assignment(&self, node: &str) -> Result<&StructuralAssignment, &str> {
        match self.assignments.get(node) {
            Some(Ok(a)) => Ok(a),
            Some(Err(reason)) => Err(reason.as_str()),
            None => Err("node is not part of the fitted model"),
        }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn fit_node(graph: &CausalGraph, data: &Dataset, node: &str) -> Result<StructuralAssignment, String> {
    let variable = data
        .variable(node)
        .ok_or_else(|| "node is latent (no dataset column)".to_string())?;
    if variable.kind() == VariableKind::Categorical {
        return Err("categorical node has no linear structural assignment".to_string());
    }
    let parents = graph.parents(node);
    if let Some(latent) = parents.iter().find(|p| !data.contains(p)) {
        return Err(format!("parent {latent} is latent"));
    }
    StructuralAssignment::fit(data, node, &parents).map_err(|e| e.to_string())
}
