//! Discovery method selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How causal structure is discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    /// Constraint-based PC discovery only.
    Statistical,
    /// Oracle-proposed graph, validated structurally.
    Llm,
    /// PC discovery with oracle resolution of undirected residuals.
    #[default]
    Hybrid,
}

impl DiscoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Llm => "llm",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statistical" => Ok(Self::Statistical),
            "llm" => Ok(Self::Llm),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown discovery method: {other}")),
        }
    }
}
