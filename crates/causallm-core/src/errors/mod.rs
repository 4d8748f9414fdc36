//! Error handling for CausalLLM.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod causal_error;
pub mod config_error;
pub mod counterfactual_error;
pub mod data_error;
pub mod discovery_error;
pub mod error_code;
pub mod graph_error;
pub mod inference_error;

pub use causal_error::{CausalError, CausalResult};
pub use config_error::ConfigError;
pub use counterfactual_error::{CounterfactualError, CounterfactualUnidentifiableError};
pub use data_error::{DatasetError, InsufficientDataError};
pub use discovery_error::DiscoveryError;
pub use error_code::CausalErrorCode;
pub use graph_error::GraphValidationError;
pub use inference_error::{InferenceError, UnidentifiableEffectError};
