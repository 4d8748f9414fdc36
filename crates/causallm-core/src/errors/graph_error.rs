//! Structural graph errors.

use super::error_code::{self, CausalErrorCode};

/// A structural invariant of a causal graph was violated.
///
/// Always fatal to the call that produced it; a graph is never returned in a
/// partially valid state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphValidationError {
    #[error("malformed graph description: {message}")]
    Malformed { message: String },

    #[error("node name must not be empty")]
    EmptyNodeName,

    #[error("duplicate node name: {name}")]
    DuplicateNode { name: String },

    #[error("edge {source_node} -> {target} references unknown node {missing}")]
    UnknownNode {
        source_node: String,
        target: String,
        missing: String,
    },

    #[error("self-loop on node {node}")]
    SelfLoop { node: String },

    #[error("duplicate edge {source_node} -> {target}")]
    DuplicateEdge { source_node: String, target: String },

    #[error("edge {source_node} -> {target} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence {
        source_node: String,
        target: String,
        confidence: f64,
    },

    #[error("cycle detected in causal graph: {}", format_cycle(.cycle))]
    CycleDetected { cycle: Vec<String> },

    #[error("no edge between {a} and {b}")]
    MissingEdge { a: String, b: String },

    #[error("graph has {count} undirected edge(s); a fully oriented DAG is required")]
    UndirectedResidual { count: usize },
}

impl GraphValidationError {
    /// Build a cycle error from a node path, closing the loop for display.
    pub fn cycle(path: Vec<String>) -> Self {
        Self::CycleDetected { cycle: path }
    }
}

/// Render a cycle as `A -> B -> C -> A`.
fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => {
            let mut out = cycle.join(" -> ");
            out.push_str(" -> ");
            out.push_str(first);
            out
        }
        None => String::from("<empty>"),
    }
}

impl CausalErrorCode for GraphValidationError {
    fn error_code(&self) -> &'static str {
        error_code::GRAPH_VALIDATION_ERROR
    }
}
