//! # causallm-inference
//!
//! Answers causal questions against a fully oriented graph.
//!
//! - `adjustment`: minimal backdoor adjustment-set search
//! - `estimator`: regression and stratification estimators, percentile bootstrap
//! - `do_operator`: `estimate_effect`, tying the two together
//! - `counterfactual`: linear structural model and abduction-action-prediction replay

pub mod adjustment;
pub mod counterfactual;
pub mod do_operator;
pub mod estimator;

pub use adjustment::find_adjustment_set;
pub use counterfactual::{CounterfactualEngine, CounterfactualIter};
pub use do_operator::DoOperator;
