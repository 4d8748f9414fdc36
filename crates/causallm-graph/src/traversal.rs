//! Structural queries over the directed part of a `CausalGraph`.
//!
//! All results are in node registration order so callers that iterate them
//! stay deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use causallm_core::errors::GraphValidationError;

use crate::graph::CausalGraph;

impl CausalGraph {
    fn neighbors_sorted(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.inner.graph.neighbors_directed(idx, dir).collect();
        out.sort();
        out.dedup();
        out
    }

    fn names(&self, nodes: impl IntoIterator<Item = NodeIndex>) -> Vec<&str> {
        nodes.into_iter().map(|i| self.inner.name(i)).collect()
    }

    pub fn parent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Incoming)
    }

    pub fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Outgoing)
    }

    /// Direct causes. Empty for unknown names.
    pub fn parents(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.names(self.parent_indices(i)))
            .unwrap_or_default()
    }

    /// Direct effects. Empty for unknown names.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.names(self.child_indices(i)))
            .unwrap_or_default()
    }

    /// Every node with a directed path into `idx`, excluding `idx`.
    pub fn ancestor_indices(&self, idx: NodeIndex) -> BTreeSet<NodeIndex> {
        self.reach(idx, Direction::Incoming)
    }

    /// Every node reachable from `idx` along directed edges, excluding `idx`.
    pub fn descendant_indices(&self, idx: NodeIndex) -> BTreeSet<NodeIndex> {
        self.reach(idx, Direction::Outgoing)
    }

    fn reach(&self, start: NodeIndex, dir: Direction) -> BTreeSet<NodeIndex> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            for next in self.inner.graph.neighbors_directed(node, dir) {
                if next != start && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen
    }

    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.names(self.ancestor_indices(i)))
            .unwrap_or_default()
    }

    pub fn descendants(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|i| self.names(self.descendant_indices(i)))
            .unwrap_or_default()
    }

    /// Whether a directed path leads from `from` to `to`.
    pub fn is_ancestor(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(f), Some(t)) => f != t && self.descendant_indices(f).contains(&t),
            _ => false,
        }
    }

    /// Node indices in topological order, ties broken by registration order.
    pub fn topological_indices(&self) -> Result<Vec<NodeIndex>, GraphValidationError> {
        let nodes = self.inner.nodes();
        let mut in_degree: HashMap<NodeIndex, usize> = nodes
            .iter()
            .map(|&n| (n, self.inner.graph.neighbors_directed(n, Direction::Incoming).count()))
            .collect();
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = nodes
            .iter()
            .filter(|n| in_degree.get(n) == Some(&0))
            .map(|&n| Reverse(n))
            .collect();

        let mut order = Vec::with_capacity(nodes.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for next in self.inner.graph.neighbors_directed(node, Direction::Outgoing) {
                if let Some(d) = in_degree.get_mut(&next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }

        if order.len() != nodes.len() {
            let stuck = nodes
                .into_iter()
                .filter(|n| in_degree.get(n).is_some_and(|&d| d > 0))
                .map(|n| self.inner.name(n).to_string())
                .collect();
            return Err(GraphValidationError::cycle(stuck));
        }
        Ok(order)
    }

    /// Variable names in topological order.
    pub fn topological_order(&self) -> Result<Vec<&str>, GraphValidationError> {
        Ok(self.names(self.topological_indices()?))
    }
}
