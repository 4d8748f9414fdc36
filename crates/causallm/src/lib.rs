//! # causallm
//!
//! One handle over the CausalLLM engines: graph parsing, causal discovery,
//! interventional effect estimation and counterfactual generation.
//!
//! ```ignore
//! let llm = CausalLlm::new(CausalConfig::default());
//! let graph = llm.discover_causal_relationships(&data, None, None).await?;
//! let effect = llm.estimate_causal_effect(&data, "smoking", "cancer", Some(&graph)).await?;
//! ```

pub mod capability;
pub mod runtime;

pub use capability::{CommunityEdition, EnterpriseInfo};
pub use runtime::CausalLlm;

pub use causallm_core::{
    CausalConfig, CausalError, CausalResult, Dataset, GraphData, InterventionResult,
};
pub use causallm_core::models::{CounterfactualTrace, DiscoveryMethod, Intervention};
pub use causallm_core::traits::{CausalOracle, NoOracle};
pub use causallm_graph::CausalGraph;
pub use causallm_inference::CounterfactualIter;
