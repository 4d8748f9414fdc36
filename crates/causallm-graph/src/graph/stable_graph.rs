//! petgraph::StableGraph wrapper with `Variable` nodes and `EdgeMeta` weights.

use std::collections::{BTreeMap, HashMap};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;

use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeMeta, EdgeSpec, GraphData, NodeSpec, Variable};

use super::builder::CausalGraphBuilder;
use super::dag_enforcement;

/// The underlying directed graph type.
pub type CausalStableGraph = StableGraph<Variable, EdgeMeta, Directed>;

/// Directed graph with O(1) lookup by variable name.
///
/// Nodes are never removed, so `NodeIndex` order is registration order.
#[derive(Debug, Clone, Default)]
pub struct IndexedGraph {
    /// The petgraph stable graph.
    pub graph: CausalStableGraph,
    /// Map from variable name to node.
    pub node_index: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable. Names must be non-empty and unique.
    pub fn add_variable(&mut self, variable: Variable) -> Result<NodeIndex, GraphValidationError> {
        if variable.name().trim().is_empty() {
            return Err(GraphValidationError::EmptyNodeName);
        }
        if self.node_index.contains_key(variable.name()) {
            return Err(GraphValidationError::DuplicateNode {
                name: variable.name().to_string(),
            });
        }
        let name = variable.name().to_string();
        let idx = self.graph.add_node(variable);
        self.node_index.insert(name, idx);
        Ok(idx)
    }

    pub fn get_node(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    pub fn name(&self, idx: NodeIndex) -> &str {
        self.graph[idx].name()
    }

    /// Resolve both endpoints of a proposed edge.
    pub fn endpoints(
        &self,
        source: &str,
        target: &str,
    ) -> Result<(NodeIndex, NodeIndex), GraphValidationError> {
        let lookup = |name: &str| {
            self.get_node(name)
                .ok_or_else(|| GraphValidationError::UnknownNode {
                    source_node: source.to_string(),
                    target: target.to_string(),
                    missing: name.to_string(),
                })
        };
        Ok((lookup(source)?, lookup(target)?))
    }

    /// Insert a directed edge, rejecting self-loops, duplicates and cycles.
    pub fn try_add_edge(
        &mut self,
        source: &str,
        target: &str,
        meta: EdgeMeta,
    ) -> Result<EdgeIndex, GraphValidationError> {
        let (s, t) = self.endpoints(source, target)?;
        if s == t {
            return Err(GraphValidationError::SelfLoop {
                node: source.to_string(),
            });
        }
        if self.graph.find_edge(s, t).is_some() {
            return Err(GraphValidationError::DuplicateEdge {
                source_node: source.to_string(),
                target: target.to_string(),
            });
        }
        if let Some(cycle) = dag_enforcement::cycle_through(self, s, t) {
            return Err(GraphValidationError::cycle(
                cycle.into_iter().map(|i| self.name(i).to_string()).collect(),
            ));
        }
        Ok(self.graph.add_edge(s, t, meta))
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort();
        nodes
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Undirected pair key, lower index first.
pub(crate) fn pair_key(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A frozen causal graph.
///
/// The directed part is acyclic at all times. Edges that discovery could not
/// orient are kept separately as undirected residuals. There is no `&mut`
/// API; refinements return a new graph.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    pub(crate) inner: IndexedGraph,
    pub(crate) undirected: BTreeMap<(NodeIndex, NodeIndex), EdgeMeta>,
}

impl CausalGraph {
    pub fn builder() -> CausalGraphBuilder {
        CausalGraphBuilder::new()
    }

    /// Read access to the underlying indexed graph.
    pub fn indexed(&self) -> &IndexedGraph {
        &self.inner
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn undirected_count(&self) -> usize {
        self.undirected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// True when no undirected residual edges remain.
    pub fn is_fully_oriented(&self) -> bool {
        self.undirected.is_empty()
    }

    /// Error unless the graph is a fully oriented DAG.
    pub fn require_oriented(&self) -> Result<(), GraphValidationError> {
        if self.is_fully_oriented() {
            Ok(())
        } else {
            Err(GraphValidationError::UndirectedResidual {
                count: self.undirected.len(),
            })
        }
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.inner.get_node(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.node_index.contains_key(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.index_of(name).map(|i| &self.inner.graph[i])
    }

    /// Variables in registration order.
    pub fn variables(&self) -> Vec<&Variable> {
        self.inner
            .nodes()
            .into_iter()
            .map(|i| &self.inner.graph[i])
            .collect()
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.variables().into_iter().map(Variable::name).collect()
    }

    /// Directed edges ordered by (source, target) registration order.
    pub fn edges(&self) -> Vec<(&str, &str, EdgeMeta)> {
        let mut edges: Vec<_> = self
            .inner
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect();
        edges.sort_by_key(|&(s, t, _)| (s, t));
        edges
            .into_iter()
            .map(|(s, t, m)| (self.inner.name(s), self.inner.name(t), m))
            .collect()
    }

    /// Undirected residual edges, lower registration index first.
    pub fn undirected_edges(&self) -> Vec<(&str, &str, EdgeMeta)> {
        self.undirected
            .iter()
            .map(|(&(a, b), &m)| (self.inner.name(a), self.inner.name(b), m))
            .collect()
    }

    /// Metadata of the directed edge `source -> target`.
    pub fn edge(&self, source: &str, target: &str) -> Option<EdgeMeta> {
        let (s, t) = (self.index_of(source)?, self.index_of(target)?);
        self.inner
            .graph
            .find_edge(s, t)
            .and_then(|e| self.inner.graph.edge_weight(e).copied())
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    pub fn has_undirected(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.undirected.contains_key(&pair_key(a, b)),
            _ => false,
        }
    }

    /// Joined by any edge, directed either way or undirected.
    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        self.has_edge(a, b) || self.has_edge(b, a) || self.has_undirected(a, b)
    }

    /// A new graph with `source -> target` added.
    ///
    /// An undirected residual between the two is replaced by the new edge.
    pub fn with_edge(
        &self,
        source: &str,
        target: &str,
        meta: EdgeMeta,
    ) -> Result<CausalGraph, GraphValidationError> {
        let mut next = self.clone();
        let (s, t) = next.inner.endpoints(source, target)?;
        next.undirected.remove(&pair_key(s, t));
        next.inner.try_add_edge(source, target, meta)?;
        Ok(next)
    }

    /// A new graph without the edge between `a` and `b`.
    ///
    /// Removes the directed edge `a -> b` if present, otherwise the undirected
    /// residual `a - b`.
    pub fn without_edge(&self, a: &str, b: &str) -> Result<CausalGraph, GraphValidationError> {
        let mut next = self.clone();
        let (ia, ib) = next.inner.endpoints(a, b)?;
        if let Some(e) = next.inner.graph.find_edge(ia, ib) {
            next.inner.graph.remove_edge(e);
        } else if next.undirected.remove(&pair_key(ia, ib)).is_none() {
            return Err(GraphValidationError::MissingEdge {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        Ok(next)
    }

    /// A new graph with the undirected residual `from - to` oriented as
    /// `from -> to`, keeping its metadata.
    pub fn with_orientation(&self, from: &str, to: &str) -> Result<CausalGraph, GraphValidationError> {
        let mut next = self.clone();
        let (f, t) = next.inner.endpoints(from, to)?;
        let meta = next
            .undirected
            .remove(&pair_key(f, t))
            .ok_or_else(|| GraphValidationError::MissingEdge {
                a: from.to_string(),
                b: to.to_string(),
            })?;
        next.inner.try_add_edge(from, to, meta)?;
        Ok(next)
    }

    /// Structural description of the nodes and directed edges.
    ///
    /// Undirected residuals have no place in `GraphData` and are omitted.
    pub fn to_graph_data(&self) -> GraphData {
        let nodes = self
            .variables()
            .into_iter()
            .map(|v| NodeSpec {
                name: v.name().to_string(),
                kind: v.kind(),
                description: v.description().map(str::to_string),
            })
            .collect();
        let edges = self
            .edges()
            .into_iter()
            .map(|(s, t, m)| EdgeSpec::new(s, t).with_confidence(m.confidence).with_origin(m.source))
            .collect();
        GraphData { nodes, edges }
    }
}
