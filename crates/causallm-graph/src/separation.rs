//! d-separation over the directed part of a graph.
//!
//! Uses the reachable-set formulation: a ball travels from the source set
//! along active trails given the conditioning set; anything it never reaches
//! is d-separated from the source.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use causallm_core::errors::GraphValidationError;

use crate::graph::CausalGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Arrival {
    /// Came up from a child.
    FromChild,
    /// Came down from a parent.
    FromParent,
}

/// True when every node in `xs` is d-separated from every node in `ys`
/// given `zs`.
pub fn d_separated(
    graph: &CausalGraph,
    xs: &[&str],
    ys: &[&str],
    zs: &[&str],
) -> Result<bool, GraphValidationError> {
    let x = resolve(graph, xs)?;
    let y = resolve(graph, ys)?;
    let z = resolve(graph, zs)?;
    Ok(separated(graph, &x, &y, &z, |_, _| true))
}

/// Backdoor check: does `zs` d-separate `treatment` from `outcome` once the
/// treatment's outgoing edges are removed?
pub fn blocks_backdoor(
    graph: &CausalGraph,
    treatment: &str,
    outcome: &str,
    zs: &[&str],
) -> Result<bool, GraphValidationError> {
    let x = resolve(graph, &[treatment])?;
    let y = resolve(graph, &[outcome])?;
    let z = resolve(graph, zs)?;
    let t = x[0];
    Ok(separated(graph, &x, &y, &z, |source, _| source != t))
}

fn resolve(graph: &CausalGraph, names: &[&str]) -> Result<Vec<NodeIndex>, GraphValidationError> {
    names
        .iter()
        .map(|n| {
            graph
                .index_of(n)
                .ok_or_else(|| GraphValidationError::UnknownNode {
                    source_node: n.to_string(),
                    target: n.to_string(),
                    missing: n.to_string(),
                })
        })
        .collect()
}

/// Reachability under `keep(source, target)`, which filters edges.
fn separated(
    graph: &CausalGraph,
    xs: &[NodeIndex],
    ys: &[NodeIndex],
    zs: &[NodeIndex],
    keep: impl Fn(NodeIndex, NodeIndex) -> bool,
) -> bool {
    let g = &graph.indexed().graph;
    let z: HashSet<NodeIndex> = zs.iter().copied().collect();

    let parents = |n: NodeIndex| -> Vec<NodeIndex> {
        g.edges_directed(n, Direction::Incoming)
            .filter(|e| keep(e.source(), e.target()))
            .map(|e| e.source())
            .collect()
    };
    let children = |n: NodeIndex| -> Vec<NodeIndex> {
        g.edges_directed(n, Direction::Outgoing)
            .filter(|e| keep(e.source(), e.target()))
            .map(|e| e.target())
            .collect()
    };

    // Conditioning nodes and their ancestors: colliders here are open.
    let mut z_ancestors: BTreeSet<NodeIndex> = BTreeSet::new();
    let mut stack: Vec<NodeIndex> = zs.to_vec();
    while let Some(n) = stack.pop() {
        if z_ancestors.insert(n) {
            stack.extend(parents(n));
        }
    }

    let targets: HashSet<NodeIndex> = ys.iter().copied().collect();
    let mut visited: HashSet<(NodeIndex, Arrival)> = HashSet::new();
    let mut queue: VecDeque<(NodeIndex, Arrival)> =
        xs.iter().map(|&x| (x, Arrival::FromChild)).collect();

    while let Some((node, arrival)) = queue.pop_front() {
        if !visited.insert((node, arrival)) {
            continue;
        }
        let observed = z.contains(&node);
        if !observed && targets.contains(&node) && !xs.contains(&node) {
            return false;
        }
        match arrival {
            Arrival::FromChild => {
                if !observed {
                    queue.extend(parents(node).into_iter().map(|p| (p, Arrival::FromChild)));
                    queue.extend(children(node).into_iter().map(|c| (c, Arrival::FromParent)));
                }
            }
            Arrival::FromParent => {
                if !observed {
                    queue.extend(children(node).into_iter().map(|c| (c, Arrival::FromParent)));
                }
                if z_ancestors.contains(&node) {
                    queue.extend(parents(node).into_iter().map(|p| (p, Arrival::FromChild)));
                }
            }
        }
    }
    true
}
