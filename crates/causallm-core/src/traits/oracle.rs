//! LLM oracle seam: structured edge proposals and orientation judgments.
//!
//! The oracle is an opaque external collaborator. Everything it returns is
//! untrusted: proposals are validated structurally before use, and any
//! malformed or missing answer is treated as `Undetermined`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Variable, VariableKind};

/// Name, kind and free-text description of a variable as shown to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    pub kind: VariableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Variable> for VariableDescriptor {
    fn from(v: &Variable) -> Self {
        Self {
            name: v.name().to_string(),
            kind: v.kind(),
            description: v.description().map(str::to_string),
        }
    }
}

/// What the oracle is asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleQuestion {
    /// Propose a full directed edge set over the variables.
    ProposeGraph,
    /// Orient the undirected edge between `a` and `b`.
    OrientEdge { a: String, b: String },
}

/// Structured oracle request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub variables: Vec<VariableDescriptor>,
    /// Directed edges already established, as `(source, target)`.
    pub known_edges: Vec<(String, String)>,
    pub question: OracleQuestion,
}

/// One edge proposed by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Orientation judgment relative to the asked `(a, b)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `a -> b`
    Forward,
    /// `b -> a`
    Backward,
    Undetermined,
}

/// Structured oracle response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OracleResponse {
    Edges(Vec<ProposedEdge>),
    Orientation {
        orientation: Orientation,
        confidence: Option<f64>,
    },
    Undetermined,
}

impl OracleResponse {
    /// Parse a raw JSON payload returned by a model.
    ///
    /// Accepted shapes:
    /// `{"edges": [{"source": "A", "target": "B", "confidence": 0.9}]}` and
    /// `{"orientation": "forward" | "backward" | "undetermined", "confidence": 0.8}`.
    /// Anything else is `Undetermined`.
    pub fn from_json(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(_) => return Self::Undetermined,
        };

        if let Some(edges) = value.get("edges") {
            return match serde_json::from_value::<Vec<ProposedEdge>>(edges.clone()) {
                Ok(edges) => Self::Edges(edges).sanitized(),
                Err(_) => Self::Undetermined,
            };
        }

        if let Some(orientation) = value.get("orientation").and_then(Value::as_str) {
            let orientation = match orientation.trim().to_ascii_lowercase().as_str() {
                "forward" | "source_to_target" | "a_causes_b" => Orientation::Forward,
                "backward" | "target_to_source" | "b_causes_a" => Orientation::Backward,
                _ => Orientation::Undetermined,
            };
            if orientation == Orientation::Undetermined {
                return Self::Undetermined;
            }
            let confidence = value.get("confidence").and_then(Value::as_f64);
            return Self::Orientation {
                orientation,
                confidence,
            }
            .sanitized();
        }

        Self::Undetermined
    }

    /// Collapse a structurally malformed answer to `Undetermined`.
    ///
    /// Malformed: a confidence that is not a finite number in `[0, 1]`, a
    /// self-loop, or the same directed pair proposed twice. Cycles are left
    /// for graph validation.
    pub fn sanitized(self) -> Self {
        let valid = |c: Option<f64>| c.map_or(true, |c| c.is_finite() && (0.0..=1.0).contains(&c));
        match self {
            Self::Edges(edges) => {
                let malformed = {
                    let mut seen = HashSet::with_capacity(edges.len());
                    edges.iter().any(|e| {
                        !valid(e.confidence)
                            || e.source == e.target
                            || !seen.insert((e.source.as_str(), e.target.as_str()))
                    })
                };
                if malformed {
                    Self::Undetermined
                } else {
                    Self::Edges(edges)
                }
            }
            Self::Orientation { confidence, .. } if !valid(confidence) => Self::Undetermined,
            other => other,
        }
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(
            self,
            Self::Undetermined
                | Self::Orientation {
                    orientation: Orientation::Undetermined,
                    ..
                }
        )
    }
}

/// External judgment capability consulted by `llm` and `hybrid` discovery.
///
/// Implementations must not retry internally; a slow answer is cut off by the
/// caller's timeout and counted as abstention.
#[allow(async_fn_in_trait)]
pub trait CausalOracle: Send + Sync {
    /// Propose a full directed edge set.
    async fn propose_graph(&self, request: &OracleRequest) -> OracleResponse;

    /// Orient a single undirected edge.
    async fn orient_edge(&self, request: &OracleRequest) -> OracleResponse;
}

/// Oracle that always abstains.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

impl CausalOracle for NoOracle {
    async fn propose_graph(&self, _request: &OracleRequest) -> OracleResponse {
        OracleResponse::Undetermined
    }

    async fn orient_edge(&self, _request: &OracleRequest) -> OracleResponse {
        OracleResponse::Undetermined
    }
}
