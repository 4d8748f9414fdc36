//! # causallm-core
//!
//! Foundation crate for the CausalLLM engine.
//! Defines the data model, traits, errors, config, constants, and the small
//! numeric toolkit shared by discovery and inference.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod stats;
pub mod tracing;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CausalConfig;
pub use errors::{
    CausalError, CausalResult, CounterfactualUnidentifiableError, GraphValidationError,
    InsufficientDataError, UnidentifiableEffectError,
};
pub use models::{
    Dataset, EdgeSource, GraphData, IndependenceResult, InterventionResult, Variable,
    VariableKind,
};
