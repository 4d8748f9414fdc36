//! Structural graph descriptions accepted by the parser.

use serde::{Deserialize, Serialize};

use super::{EdgeSource, VariableKind};

/// A node entry in a structural description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub kind: VariableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Continuous,
            description: None,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            kind: VariableKind::Categorical,
            ..Self::new(name)
        }
    }
}

/// A directed edge entry in a structural description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, alias = "source_kind", skip_serializing_if = "Option::is_none")]
    pub origin: Option<EdgeSource>,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            confidence: None,
            origin: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_origin(mut self, origin: EdgeSource) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Node list plus directed edge list.
///
/// Untrusted until it has been through the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl GraphData {
    /// Build a description from node names and `(source, target)` pairs.
    pub fn from_edges<S: AsRef<str>>(nodes: &[S], edges: &[(S, S)]) -> Self {
        Self {
            nodes: nodes.iter().map(|n| NodeSpec::new(n.as_ref())).collect(),
            edges: edges
                .iter()
                .map(|(s, t)| EdgeSpec::new(s.as_ref(), t.as_ref()))
                .collect(),
        }
    }
}
