//! Minimal backdoor adjustment-set search.
//!
//! Candidates are observed non-descendants of the treatment that are
//! ancestors of the treatment or the outcome. Subsets are tried by increasing
//! size in graph registration order; the first one that blocks every backdoor
//! path wins. Nodes without a dataset column are latent and never adjustable.

use std::collections::BTreeSet;

use tracing::debug;

use causallm_core::errors::{InferenceError, UnidentifiableEffectError};
use causallm_core::models::{AdjustmentSet, Dataset};
use causallm_core::stats::Combinations;
use causallm_graph::separation::blocks_backdoor;
use causallm_graph::CausalGraph;

/// Find the smallest observed set satisfying the backdoor criterion.
///
/// Enumeration is exhaustive up to `max_size`; beyond that only the full
/// candidate pool is tried.
pub fn find_adjustment_set(
    graph: &CausalGraph,
    data: &Dataset,
    treatment: &str,
    outcome: &str,
    max_size: usize,
) -> Result<AdjustmentSet, InferenceError> {
    let pool = candidates(graph, data, treatment, outcome)?;
    debug!(treatment, outcome, candidates = pool.len(), "adjustment search started");

    for size in 0..=pool.len().min(max_size) {
        for chosen in Combinations::new(&pool, size) {
            if blocks_backdoor(graph, treatment, outcome, &chosen)? {
                debug!(treatment, outcome, size, "adjustment set found");
                return Ok(AdjustmentSet::new(
                    chosen.into_iter().map(str::to_string).collect(),
                ));
            }
        }
    }

    if pool.len() > max_size && blocks_backdoor(graph, treatment, outcome, &pool)? {
        debug!(treatment, outcome, size = pool.len(), "full candidate pool blocks backdoors");
        return Ok(AdjustmentSet::new(pool.iter().map(|s| s.to_string()).collect()));
    }

    let latent = graph
        .node_names()
        .into_iter()
        .filter(|n| !data.contains(n))
        .count();
    Err(UnidentifiableEffectError {
        treatment: treatment.to_string(),
        outcome: outcome.to_string(),
        reason: format!(
            "no set of observed variables blocks every backdoor path ({latent} latent node(s) in the graph)"
        ),
    }
    .into())
}

fn candidates<'g>(
    graph: &'g CausalGraph,
    data: &Dataset,
    treatment: &str,
    outcome: &str,
) -> Result<Vec<&'g str>, InferenceError> {
    let (t, y) = match (graph.index_of(treatment), graph.index_of(outcome)) {
        (Some(t), Some(y)) => (t, y),
        (None, _) => {
            return Err(InferenceError::UnknownVariable {
                name: treatment.to_string(),
            })
        }
        (_, None) => {
            return Err(InferenceError::UnknownVariable {
                name: outcome.to_string(),
            })
        }
    };

    let descendants = graph.descendant_indices(t);
    let relevant: BTreeSet<_> = graph
        .ancestor_indices(t)
        .into_iter()
        .chain(graph.ancestor_indices(y))
        .collect();

    let g = graph.indexed();
    Ok(g.nodes()
        .into_iter()
        .filter(|&n| n != t && n != y)
        .filter(|n| relevant.contains(n) && !descendants.contains(n))
        .map(|n| g.name(n))
        .filter(|name| data.contains(name))
        .collect())
}
