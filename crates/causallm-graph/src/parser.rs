//! Structural descriptions to validated, frozen graphs.

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::cmp::Reverse;

use tracing::debug;

use causallm_core::constants::DEFAULT_PRIOR_CONFIDENCE;
use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeMeta, EdgeSource, GraphData, Variable};

use crate::graph::{CausalGraph, CausalGraphBuilder};

/// Validates a `GraphData` and produces a `CausalGraph`.
///
/// Checks run in a fixed order (node names, edge endpoints, self-loops,
/// duplicate edges and confidences, then acyclicity), so the first problem
/// found is always the one reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagParser;

impl DagParser {
    pub fn new() -> Self {
        Self
    }

    /// Deserialize JSON, then `parse`.
    pub fn parse_json(&self, json: &str) -> Result<CausalGraph, GraphValidationError> {
        let data: GraphData =
            serde_json::from_str(json).map_err(|e| GraphValidationError::Malformed {
                message: e.to_string(),
            })?;
        self.parse(&data)
    }

    pub fn parse(&self, data: &GraphData) -> Result<CausalGraph, GraphValidationError> {
        // 1. node names
        let mut position: HashMap<&str, usize> = HashMap::with_capacity(data.nodes.len());
        for (i, node) in data.nodes.iter().enumerate() {
            if node.name.trim().is_empty() {
                return Err(GraphValidationError::EmptyNodeName);
            }
            if position.insert(node.name.as_str(), i).is_some() {
                return Err(GraphValidationError::DuplicateNode {
                    name: node.name.clone(),
                });
            }
        }

        // 2. edge endpoints
        let mut edges: Vec<(usize, usize)> = Vec::with_capacity(data.edges.len());
        for edge in &data.edges {
            let endpoint = |name: &str| {
                position
                    .get(name)
                    .copied()
                    .ok_or_else(|| GraphValidationError::UnknownNode {
                        source_node: edge.source.clone(),
                        target: edge.target.clone(),
                        missing: name.to_string(),
                    })
            };
            edges.push((endpoint(&edge.source)?, endpoint(&edge.target)?));
        }

        // 3. self-loops
        if let Some(edge) = data.edges.iter().find(|e| e.source == e.target) {
            return Err(GraphValidationError::SelfLoop {
                node: edge.source.clone(),
            });
        }

        // 4. duplicates and confidences
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());
        for (edge, &pair) in data.edges.iter().zip(&edges) {
            if !seen.insert(pair) {
                return Err(GraphValidationError::DuplicateEdge {
                    source_node: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
            if let Some(c) = edge.confidence {
                if !(0.0..=1.0).contains(&c) {
                    return Err(GraphValidationError::InvalidConfidence {
                        source_node: edge.source.clone(),
                        target: edge.target.clone(),
                        confidence: c,
                    });
                }
            }
        }

        // 5. acyclicity
        let names: Vec<&str> = data.nodes.iter().map(|n| n.name.as_str()).collect();
        let order = topological_sort(names.len(), &edges).map_err(|cycle| {
            GraphValidationError::cycle(cycle.into_iter().map(|i| names[i].to_string()).collect())
        })?;
        debug!(
            nodes = names.len(),
            edges = edges.len(),
            first = order.first().map(|&i| names[i]),
            "structural input is acyclic"
        );

        let mut builder = CausalGraphBuilder::new();
        for (i, node) in data.nodes.iter().enumerate() {
            let mut variable = Variable::new(node.name.clone(), node.kind, i);
            if let Some(description) = &node.description {
                variable = variable.with_description(description.clone());
            }
            builder.add_variable(variable)?;
        }
        for edge in &data.edges {
            let meta = EdgeMeta::new(
                edge.confidence.unwrap_or(DEFAULT_PRIOR_CONFIDENCE),
                edge.origin.unwrap_or(EdgeSource::Prior),
            );
            builder.add_edge(&edge.source, &edge.target, meta)?;
        }
        Ok(builder.build())
    }
}

/// Kahn's algorithm over node positions, smallest ready position first.
///
/// On failure returns one cycle, rotated to start at its smallest position.
fn topological_sort(n: usize, edges: &[(usize, usize)]) -> Result<Vec<usize>, Vec<usize>> {
    let mut in_degree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(s, t) in edges {
        in_degree[t] += 1;
        successors[s].push(t);
        predecessors[t].push(s);
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &next in &successors[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    // Every leftover node still has a leftover predecessor: walk backwards
    // until a node repeats.
    let leftover: Vec<bool> = (0..n).map(|i| in_degree[i] > 0).collect();
    let start = (0..n).find(|&i| leftover[i]).unwrap_or(0);
    let mut walk = vec![start];
    let mut visited_at: HashMap<usize, usize> = HashMap::from([(start, 0)]);
    let mut cur = start;
    loop {
        let Some(&pred) = predecessors[cur].iter().filter(|&&p| leftover[p]).min() else {
            return Err(walk);
        };
        if let Some(&at) = visited_at.get(&pred) {
            let mut cycle: Vec<usize> = walk[at..].to_vec();
            cycle.reverse();
            let min_pos = cycle
                .iter()
                .enumerate()
                .min_by_key(|&(_, &v)| v)
                .map(|(i, _)| i)
                .unwrap_or(0);
            cycle.rotate_left(min_pos);
            return Err(cycle);
        }
        visited_at.insert(pred, walk.len());
        walk.push(pred);
        cur = pred;
    }
}
