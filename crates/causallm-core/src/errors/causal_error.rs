//! Top-level error aggregating every subsystem error via `From` conversions.

use super::error_code::CausalErrorCode;
use super::{
    ConfigError, CounterfactualError, CounterfactualUnidentifiableError, DatasetError,
    DiscoveryError, GraphValidationError, InferenceError, InsufficientDataError,
    UnidentifiableEffectError,
};

/// Any error surfaced by the public CausalLLM operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CausalError {
    #[error(transparent)]
    Graph(#[from] GraphValidationError),

    #[error(transparent)]
    Data(#[from] InsufficientDataError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Counterfactual(#[from] CounterfactualError),

    #[error(transparent)]
    CounterfactualUnit(#[from] CounterfactualUnidentifiableError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<UnidentifiableEffectError> for CausalError {
    fn from(e: UnidentifiableEffectError) -> Self {
        Self::Inference(InferenceError::Unidentifiable(e))
    }
}

impl CausalError {
    /// Whether this error signals an unidentifiable effect rather than a defect.
    pub fn is_unidentifiable(&self) -> bool {
        matches!(self, Self::Inference(InferenceError::Unidentifiable(_)))
    }
}

impl CausalErrorCode for CausalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Data(e) => e.error_code(),
            Self::Dataset(e) => e.error_code(),
            Self::Discovery(e) => e.error_code(),
            Self::Inference(e) => e.error_code(),
            Self::Counterfactual(e) => e.error_code(),
            Self::CounterfactualUnit(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Convenience alias used by the facade.
pub type CausalResult<T> = Result<T, CausalError>;
