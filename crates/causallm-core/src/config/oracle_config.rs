//! Oracle consultation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for LLM-oracle consultations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// Per-call timeout in milliseconds. A timeout counts as abstention. Default: 30000.
    pub timeout_ms: Option<u64>,
    /// Proposed edges below this confidence are dropped. Default: 0.0.
    pub min_confidence: Option<f64>,
}

impl OracleConfig {
    /// Returns the effective per-call timeout.
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeout_ms
                .unwrap_or(constants::DEFAULT_ORACLE_TIMEOUT_MS),
        )
    }

    /// Returns the effective minimum edge confidence.
    pub fn effective_min_confidence(&self) -> f64 {
        self.min_confidence
            .unwrap_or(constants::DEFAULT_ORACLE_MIN_CONFIDENCE)
    }
}
