//! Cycle detection run before every edge insertion.
//! Rejects any edge that would create a cycle in the DAG.

use std::collections::{HashMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::Dfs;
use petgraph::Direction;

use super::stable_graph::{CausalStableGraph, IndexedGraph};

/// Check whether adding an edge from `source` to `target` would create a cycle.
///
/// Returns `true` if a cycle would be created (edge should be rejected).
pub fn would_create_cycle(graph: &IndexedGraph, source: NodeIndex, target: NodeIndex) -> bool {
    // Self-loops are always cycles.
    if source == target {
        return true;
    }
    // If target already reaches source, source -> target closes a loop.
    has_path(&graph.graph, target, source)
}

/// DFS reachability: can we reach `to` from `from`?
pub fn has_path(graph: &CausalStableGraph, from: NodeIndex, to: NodeIndex) -> bool {
    let mut dfs = Dfs::new(graph, from);
    while let Some(node) = dfs.next(graph) {
        if node == to {
            return true;
        }
    }
    false
}

/// The cycle that `source -> target` would close, starting at `source`.
///
/// BFS from `target` back to `source` gives the shortest such loop. `None`
/// when the edge is safe.
pub fn cycle_through(
    graph: &IndexedGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    if source == target {
        return Some(vec![source]);
    }
    if !would_create_cycle(graph, source, target) {
        return None;
    }

    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([target]);
    parent.insert(target, target);
    while let Some(node) = queue.pop_front() {
        if node == source {
            break;
        }
        let mut next: Vec<NodeIndex> = graph
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        next.sort();
        for n in next {
            if let std::collections::hash_map::Entry::Vacant(slot) = parent.entry(n) {
                slot.insert(node);
                queue.push_back(n);
            }
        }
    }

    // Walk back source <- ... <- target, then lead with source.
    let mut path = vec![source];
    let mut cur = source;
    while cur != target {
        cur = *parent.get(&cur)?;
        path.push(cur);
    }
    path.reverse();
    // path = [target, ..., source]; rotate so the new edge reads first.
    path.rotate_right(1);
    Some(path)
}

/// Strongly connected components with more than one node (i.e., cycles).
pub fn find_cycles(graph: &IndexedGraph) -> Vec<Vec<NodeIndex>> {
    tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .collect()
}
