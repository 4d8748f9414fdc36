//! CausalErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured error code string
/// that callers can match on without parsing messages.
pub trait CausalErrorCode {
    /// Returns the error code string (e.g., "GRAPH_VALIDATION_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const GRAPH_VALIDATION_ERROR: &str = "GRAPH_VALIDATION_ERROR";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const DATASET_ERROR: &str = "DATASET_ERROR";
pub const UNIDENTIFIABLE_EFFECT: &str = "UNIDENTIFIABLE_EFFECT";
pub const COUNTERFACTUAL_UNIDENTIFIABLE: &str = "COUNTERFACTUAL_UNIDENTIFIABLE";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
pub const ORACLE_ABSTAINED: &str = "ORACLE_ABSTAINED";
pub const HYBRID_MERGE_FAILED: &str = "HYBRID_MERGE_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const WORKER_FAILED: &str = "WORKER_FAILED";
