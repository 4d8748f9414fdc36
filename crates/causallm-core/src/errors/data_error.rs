//! Dataset construction and statistical-coverage errors.

use super::error_code::{self, CausalErrorCode};

/// A statistic cannot be computed from the available data.
///
/// Discovery absorbs these per edge decision; estimation treats them as fatal
/// for the estimate at hand.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InsufficientDataError {
    #[error("column {name} is not present in the dataset")]
    MissingColumn { name: String },

    #[error("need at least {needed} complete rows, found {available}")]
    TooFewSamples { needed: usize, available: usize },

    #[error("column {variable} has zero variance over the usable rows")]
    ZeroVariance { variable: String },

    #[error("singular matrix while computing {context}")]
    SingularMatrix { context: String },

    #[error("no degrees of freedom left for the test of {x} and {y}")]
    NoDegreesOfFreedom { x: String, y: String },

    #[error("no overlap between treated and control units in any stratum of {treatment}")]
    NoOverlap { treatment: String },

    #[error("treatment {treatment} must take exactly two levels for stratification, found {levels}")]
    NonBinaryTreatment { treatment: String, levels: usize },

    #[error("only {succeeded} of {requested} bootstrap replicates could be estimated")]
    BootstrapFailed { succeeded: usize, requested: usize },
}

impl CausalErrorCode for InsufficientDataError {
    fn error_code(&self) -> &'static str {
        error_code::INSUFFICIENT_DATA
    }
}

/// A dataset could not be constructed from the supplied columns.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("column {name} has {found} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    #[error("column name must not be empty")]
    EmptyColumnName,

    #[error("categorical column {name} holds non-integral code {value} at row {row}")]
    InvalidCategory { name: String, row: usize, value: f64 },

    #[error("malformed dataset description: {message}")]
    Malformed { message: String },
}

impl CausalErrorCode for DatasetError {
    fn error_code(&self) -> &'static str {
        error_code::DATASET_ERROR
    }
}
