//! Per-edge metadata carried by causal graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Where an edge (or its orientation) came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    /// Established from data by independence testing.
    Statistical,
    /// Proposed or oriented by the LLM oracle.
    Llm,
    /// Declared in structural input.
    #[default]
    Prior,
}

impl EdgeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Llm => "llm",
            Self::Prior => "prior",
        }
    }
}

impl fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge metadata: confidence in `[0, 1]` and provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeMeta {
    pub confidence: f64,
    pub source: EdgeSource,
}

impl EdgeMeta {
    /// Create metadata, clamping confidence into `[0, 1]`.
    pub fn new(confidence: f64, source: EdgeSource) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { confidence, source }
    }

    pub fn prior() -> Self {
        Self::new(constants::DEFAULT_PRIOR_CONFIDENCE, EdgeSource::Prior)
    }

    pub fn statistical(confidence: f64) -> Self {
        Self::new(confidence, EdgeSource::Statistical)
    }

    pub fn llm(confidence: f64) -> Self {
        Self::new(confidence, EdgeSource::Llm)
    }
}

impl Default for EdgeMeta {
    fn default() -> Self {
        Self::prior()
    }
}
