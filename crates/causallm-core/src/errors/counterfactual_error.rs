//! Counterfactual generation errors.

use super::error_code::{self, CausalErrorCode};
use super::{GraphValidationError, InsufficientDataError};

/// A single unit's counterfactual cannot be computed.
///
/// Per-unit: the engine reports it for that unit and moves on to the next.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("counterfactual for unit {unit} is not identifiable at node {node}: {reason}")]
pub struct CounterfactualUnidentifiableError {
    pub unit: usize,
    pub node: String,
    pub reason: String,
}

impl CausalErrorCode for CounterfactualUnidentifiableError {
    fn error_code(&self) -> &'static str {
        error_code::COUNTERFACTUAL_UNIDENTIFIABLE
    }
}

/// Fatal errors that abort a counterfactual batch before any unit is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CounterfactualError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphValidationError),

    #[error("Insufficient data: {0}")]
    Data(#[from] InsufficientDataError),

    #[error("variable {name} is not a node of the graph")]
    UnknownVariable { name: String },

    #[error("intervened variable {name} has no column in the dataset")]
    UnobservedVariable { name: String },

    #[error("unit {unit} is out of range for a dataset of {rows} rows")]
    UnitOutOfRange { unit: usize, rows: usize },

    #[error("cannot set {name} to {value}: {reason}")]
    InvalidInterventionValue {
        name: String,
        value: f64,
        reason: String,
    },
}

impl CausalErrorCode for CounterfactualError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::UnknownVariable { .. }
            | Self::UnobservedVariable { .. }
            | Self::UnitOutOfRange { .. }
            | Self::InvalidInterventionValue { .. } => error_code::INVALID_QUERY,
        }
    }
}
