//! Effect-estimation errors.

use super::error_code::{self, CausalErrorCode};
use super::{GraphValidationError, InsufficientDataError};

/// No valid backdoor adjustment set exists for the query.
///
/// This is an expected, signaled outcome: the effect cannot be estimated from
/// this graph and data combination.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("effect of {treatment} on {outcome} is not identifiable: {reason}")]
pub struct UnidentifiableEffectError {
    pub treatment: String,
    pub outcome: String,
    pub reason: String,
}

impl CausalErrorCode for UnidentifiableEffectError {
    fn error_code(&self) -> &'static str {
        error_code::UNIDENTIFIABLE_EFFECT
    }
}

/// Errors that can occur while estimating an interventional effect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphValidationError),

    #[error("Insufficient data: {0}")]
    Data(#[from] InsufficientDataError),

    #[error(transparent)]
    Unidentifiable(#[from] UnidentifiableEffectError),

    #[error("variable {name} is not a node of the graph")]
    UnknownVariable { name: String },

    #[error("variable {name} has no column in the dataset")]
    UnobservedVariable { name: String },

    #[error("treatment and outcome must differ, both are {name}")]
    TreatmentIsOutcome { name: String },

    #[error("outcome {outcome} is an ancestor of treatment {treatment}")]
    OutcomePrecedesTreatment { treatment: String, outcome: String },
}

impl CausalErrorCode for InferenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::Unidentifiable(e) => e.error_code(),
            Self::UnknownVariable { .. }
            | Self::UnobservedVariable { .. }
            | Self::TreatmentIsOutcome { .. }
            | Self::OutcomePrecedesTreatment { .. } => error_code::INVALID_QUERY,
        }
    }
}
