//! Configuration system for CausalLLM.
//! TOML-based, 4-layer resolution: overrides > env > project > user > defaults.

pub mod causal_config;
pub mod discovery_config;
pub mod estimation_config;
pub mod oracle_config;

pub use causal_config::{CausalConfig, ConfigOverrides};
pub use discovery_config::{CiTestSelection, DiscoveryConfig};
pub use estimation_config::{EstimationConfig, EstimatorKind};
pub use oracle_config::OracleConfig;
