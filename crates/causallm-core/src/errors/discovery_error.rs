//! Causal-discovery errors.

use super::error_code::{self, CausalErrorCode};
use super::{GraphValidationError, InsufficientDataError};

/// Errors that can occur during causal discovery.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphValidationError),

    #[error("Insufficient data: {0}")]
    Data(#[from] InsufficientDataError),

    #[error("variable {name} is not a column of the dataset")]
    UnknownVariable { name: String },

    #[error("oracle abstained from proposing a graph")]
    OracleAbstained,

    #[error("hybrid merge produced an invalid graph: {0}")]
    HybridMerge(#[source] GraphValidationError),

    #[error("Discovery cancelled")]
    Cancelled,

    #[error("discovery worker failed: {message}")]
    WorkerFailed { message: String },
}

impl CausalErrorCode for DiscoveryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::UnknownVariable { .. } => error_code::INVALID_QUERY,
            Self::OracleAbstained => error_code::ORACLE_ABSTAINED,
            Self::HybridMerge(_) => error_code::HYBRID_MERGE_FAILED,
            Self::Cancelled => error_code::CANCELLED,
            Self::WorkerFailed { .. } => error_code::WORKER_FAILED,
        }
    }
}
