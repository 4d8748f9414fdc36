//! Incremental construction of a `CausalGraph`.

use std::collections::BTreeMap;

use petgraph::stable_graph::NodeIndex;

use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeMeta, Variable, VariableKind};

use super::stable_graph::{pair_key, CausalGraph, IndexedGraph};

/// Builds a graph one node or edge at a time.
///
/// Every insertion is validated on the spot, so the directed part is acyclic
/// after every successful call and `build` cannot fail.
#[derive(Debug, Clone, Default)]
pub struct CausalGraphBuilder {
    graph: IndexedGraph,
    undirected: BTreeMap<(NodeIndex, NodeIndex), EdgeMeta>,
}

impl CausalGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable as-is (its `index` is kept).
    pub fn add_variable(&mut self, variable: Variable) -> Result<&mut Self, GraphValidationError> {
        self.graph.add_variable(variable)?;
        Ok(self)
    }

    /// Register a node by name; its index is the registration order.
    pub fn add_node(&mut self, name: &str, kind: VariableKind) -> Result<&mut Self, GraphValidationError> {
        let index = self.graph.node_count();
        self.add_variable(Variable::new(name, kind, index))
    }

    /// Add a directed edge. Fails on unknown endpoints, self-loops,
    /// duplicates, existing undirected adjacency, or a cycle.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        meta: EdgeMeta,
    ) -> Result<&mut Self, GraphValidationError> {
        let (s, t) = self.graph.endpoints(source, target)?;
        if s != t && self.undirected.contains_key(&pair_key(s, t)) {
            return Err(GraphValidationError::DuplicateEdge {
                source_node: source.to_string(),
                target: target.to_string(),
            });
        }
        self.graph.try_add_edge(source, target, meta)?;
        Ok(self)
    }

    /// Add an undirected residual edge between two nodes not yet adjacent.
    pub fn add_undirected_edge(
        &mut self,
        a: &str,
        b: &str,
        meta: EdgeMeta,
    ) -> Result<&mut Self, GraphValidationError> {
        let (ia, ib) = self.graph.endpoints(a, b)?;
        if ia == ib {
            return Err(GraphValidationError::SelfLoop {
                node: a.to_string(),
            });
        }
        let adjacent = self.graph.graph.find_edge(ia, ib).is_some()
            || self.graph.graph.find_edge(ib, ia).is_some()
            || self.undirected.contains_key(&pair_key(ia, ib));
        if adjacent {
            return Err(GraphValidationError::DuplicateEdge {
                source_node: a.to_string(),
                target: b.to_string(),
            });
        }
        self.undirected.insert(pair_key(ia, ib), meta);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.graph.get_node(name).is_some()
    }

    /// Freeze into an immutable graph.
    pub fn build(self) -> CausalGraph {
        CausalGraph {
            inner: self.graph,
            undirected: self.undirected,
        }
    }
}
