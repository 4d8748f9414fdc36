//! Data model shared by every CausalLLM component.

pub mod counterfactual;
pub mod dataset;
pub mod discovery;
pub mod edge;
pub mod graph_data;
pub mod independence;
pub mod intervention;
pub mod variable;

pub use counterfactual::{CounterfactualTrace, Intervention};
pub use dataset::{Dataset, DatasetBuilder};
pub use discovery::DiscoveryMethod;
pub use edge::{EdgeMeta, EdgeSource};
pub use graph_data::{EdgeSpec, GraphData, NodeSpec};
pub use independence::{IndependenceResult, TestMethod, TestStatistic};
pub use intervention::{AdjustmentSet, EstimationMethod, InterventionResult};
pub use variable::{Variable, VariableKind};
